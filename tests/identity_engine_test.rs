// ==========================================
// 身份解析引擎集成测试
// ==========================================
// 测试目标: 验证替换消息 → 替换映射 → 展示身份 全链路
// ==========================================

use dispatch_board::domain::customer::Customer;
use dispatch_board::domain::item::DispatchItem;
use dispatch_board::domain::message::{OperationalMessage, SUBJECT_WRONG_CUSTOMER};
use dispatch_board::domain::types::ItemKind;
use dispatch_board::{IdentityResolver, ReplacementExtractor};

fn known_customer() -> Customer {
    Customer {
        customer_number: "C-200".to_string(),
        customer_name: "Levi".to_string(),
        city: "Akko".to_string(),
        address: "HaAtsmaut 18".to_string(),
        phone: Some("04-9912345".to_string()),
        agent_number: None,
    }
}

fn order_item() -> DispatchItem {
    let mut item = DispatchItem::new(ItemKind::Order, 12, "Cohen", "Haifa", "HaNamal 3");
    item.customer_number = Some("C-100".to_string());
    item
}

#[test]
fn test_full_chain_resolved_replacement() {
    let extractor = ReplacementExtractor::new();
    let resolver = IdentityResolver::new();

    let messages = vec![OperationalMessage::new(
        "office",
        SUBJECT_WRONG_CUSTOMER,
        "order: 12\ncustomer: Levi\ncity: Akko",
    )];
    let map = extractor.build_map(&messages, &[known_customer()]);

    let identity = resolver.resolve_display_identity(&order_item(), &map);
    // 展示替换客户的**当前**档案资料, 而非单据行陈旧数据
    assert_eq!(identity.customer_name, "Levi");
    assert_eq!(identity.address, "HaAtsmaut 18");
    assert_eq!(identity.city, "Akko");
    assert_eq!(identity.customer_number.as_deref(), Some("C-200"));
    assert_eq!(identity.phone.as_deref(), Some("04-9912345"));
}

#[test]
fn test_full_chain_unknown_replacement_hides_original_details() {
    let extractor = ReplacementExtractor::new();
    let resolver = IdentityResolver::new();

    let messages = vec![OperationalMessage::new(
        "office",
        SUBJECT_WRONG_CUSTOMER,
        "order: 12\ncustomer: Mizrahi",
    )];
    // 客户档案里没有 Mizrahi
    let map = extractor.build_map(&messages, &[known_customer()]);

    let identity = resolver.resolve_display_identity(&order_item(), &map);
    assert_eq!(identity.customer_name, "Mizrahi");
    // 城市缺省时回落到单据城市
    assert_eq!(identity.city, "Haifa");
    // 原客户的地址/电话/编号绝不透出
    assert_eq!(identity.address, "");
    assert!(identity.customer_number.is_none());
    assert!(identity.phone.is_none());
}

#[test]
fn test_identity_law_for_unrelated_items() {
    let extractor = ReplacementExtractor::new();
    let resolver = IdentityResolver::new();

    let messages = vec![OperationalMessage::new(
        "office",
        SUBJECT_WRONG_CUSTOMER,
        "return: 12\ncustomer: Levi",
    )];
    let map = extractor.build_map(&messages, &[known_customer()]);

    // 替换针对 return-12, 不影响 order-12
    let identity = resolver.resolve_display_identity(&order_item(), &map);
    assert_eq!(identity.customer_name, "Cohen");
    assert_eq!(identity.address, "HaNamal 3");
    assert_eq!(identity.customer_number.as_deref(), Some("C-100"));
}

// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 验证共享连接下各仓储的落库 → 读取 → 归一化流程
// ==========================================


use dispatch_board::domain::customer::Customer;
use dispatch_board::domain::message::{OperationalMessage, SUBJECT_WRONG_CUSTOMER};
use dispatch_board::domain::types::{ItemKind, ScheduleOverlay};
use dispatch_board::logging;
use test_helpers::{build_repos, create_test_db, seed_item, seed_schedule};

#[test]
fn test_shared_connection_repositories() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("Failed to create test db");
    let repos = build_repos(&db_path).expect("Failed to build repos");

    seed_schedule(&repos, 10, "Avi").expect("Failed to seed schedule");
    seed_item(&repos, ItemKind::Order, 1, "Cohen", "Haifa", Some(10), None)
        .expect("Failed to seed item");

    let schedule = repos
        .schedules
        .find_schedule(10)
        .expect("find")
        .expect("missing schedule");
    assert_eq!(schedule.driver_name, "Avi");

    let item = repos
        .items
        .find_by_id(ItemKind::Order, 1)
        .expect("find")
        .expect("missing item");
    assert_eq!(item.primary_schedule_id, Some(10));
    assert_eq!(item.reassigned_ref, ScheduleOverlay::Unset);
}

#[test]
fn test_overlay_column_normalization_on_read() {
    let (_tmp, db_path) = create_test_db().expect("Failed to create test db");
    let repos = build_repos(&db_path).expect("Failed to build repos");

    // 三代历史格式同表共存
    seed_item(&repos, ItemKind::Order, 1, "Cohen", "Haifa", Some(3), Some("10"))
        .expect("seed");
    seed_item(
        &repos,
        ItemKind::Order,
        2,
        "Cohen",
        "Haifa",
        Some(3),
        Some(r#"{"scheduleId": 10}"#),
    )
    .expect("seed");
    seed_item(
        &repos,
        ItemKind::Order,
        3,
        "Cohen",
        "Haifa",
        None,
        Some(r#"[10, {"scheduleId": 7}, "junk"]"#),
    )
    .expect("seed");

    let items = repos.items.list(ItemKind::Order).expect("list");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].reassigned_ref, ScheduleOverlay::Single(10));
    assert_eq!(items[1].reassigned_ref, ScheduleOverlay::Single(10));
    assert_eq!(items[2].reassigned_ref, ScheduleOverlay::Many(vec![10, 7]));
}

#[test]
fn test_message_and_customer_roundtrip() {
    let (_tmp, db_path) = create_test_db().expect("Failed to create test db");
    let repos = build_repos(&db_path).expect("Failed to build repos");

    repos
        .customers
        .upsert(&Customer {
            customer_number: "C-200".to_string(),
            customer_name: "Levi".to_string(),
            city: "Akko".to_string(),
            address: "HaAtsmaut 18".to_string(),
            phone: None,
            agent_number: None,
        })
        .expect("upsert customer");

    let mut notice = OperationalMessage::new(
        "office",
        SUBJECT_WRONG_CUSTOMER,
        "order: 1\ncustomer: Levi",
    );
    notice.related_kind = Some(ItemKind::Order);
    notice.related_id = Some(1);
    repos.messages.insert(&notice).expect("insert message");

    let notices = repos
        .messages
        .list_by_subject(SUBJECT_WRONG_CUSTOMER)
        .expect("list");
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].related_kind, Some(ItemKind::Order));

    let customer = repos
        .customers
        .find_by_name_city("Levi", "Akko")
        .expect("find")
        .expect("missing customer");
    assert_eq!(customer.customer_number, "C-200");
}

#[test]
fn test_unassigned_pool_across_kinds() {
    let (_tmp, db_path) = create_test_db().expect("Failed to create test db");
    let repos = build_repos(&db_path).expect("Failed to build repos");

    seed_item(&repos, ItemKind::Order, 1, "Cohen", "Haifa", None, None).expect("seed");
    seed_item(&repos, ItemKind::Order, 2, "Cohen", "Haifa", Some(5), None).expect("seed");
    // 仅覆盖、无原始归属: 不属于未分配池
    seed_item(&repos, ItemKind::Return, 1, "Levi", "Akko", None, Some("9")).expect("seed");
    seed_item(&repos, ItemKind::Return, 2, "Levi", "Akko", None, None).expect("seed");

    let orders = repos.items.list_unassigned(ItemKind::Order).expect("list");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, 1);

    let returns = repos.items.list_unassigned(ItemKind::Return).expect("list");
    assert_eq!(returns.len(), 1);
    assert_eq!(returns[0].id, 2);
}

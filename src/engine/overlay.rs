// ==========================================
// 物流配送调度看板 - 调线覆盖归一化
// ==========================================
// 覆盖字段历经多轮录入格式变更, 同一列中存有:
//   null / 裸整数 / {"scheduleId": n} 对象 / 两者混合的数组
// 本模块把原始 JSON 一次性归一化为 ScheduleOverlay,
// 下游不再接触原始形态。
// 红线: 全函数,不抛错; 畸形元素跳过并计数
// ==========================================

use crate::domain::types::ScheduleOverlay;
use serde_json::Value;

/// 对象形态中的调度号键名 (历史录入格式)
const SCHEDULE_ID_KEY: &str = "scheduleId";

// ==========================================
// OverlayParse - 归一化结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayParse {
    pub overlay: ScheduleOverlay,
    pub skipped: u32, // 被跳过的畸形元素数 (诊断用)
}

impl OverlayParse {
    fn unset() -> Self {
        Self {
            overlay: ScheduleOverlay::Unset,
            skipped: 0,
        }
    }
}

/// 归一化覆盖字段的原始 JSON 文本
///
/// # 参数
/// - raw: 列中存储的原始文本; None 表示字段缺失
///
/// # 返回
/// 归一化结果。文本存在但整体不可解析时返回 Many([]) 并计数,
/// 保持"字段存在"这一事实 (is_modified 语义依赖它)。
pub fn parse_overlay(raw: Option<&str>) -> OverlayParse {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return OverlayParse::unset(),
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => {
            // 整体不是 JSON: 尝试按裸整数文本兜底 (最早期格式直接存数字)
            if let Ok(id) = raw.trim().parse::<i64>() {
                return OverlayParse {
                    overlay: ScheduleOverlay::Single(id),
                    skipped: 0,
                };
            }
            return OverlayParse {
                overlay: ScheduleOverlay::Many(Vec::new()),
                skipped: 1,
            };
        }
    };

    parse_overlay_value(&value)
}

/// 归一化已解析的 JSON 值
pub fn parse_overlay_value(value: &Value) -> OverlayParse {
    match value {
        Value::Null => OverlayParse::unset(),
        Value::Number(_) => match extract_id(value) {
            Some(id) => OverlayParse {
                overlay: ScheduleOverlay::Single(id),
                skipped: 0,
            },
            None => OverlayParse {
                overlay: ScheduleOverlay::Many(Vec::new()),
                skipped: 1,
            },
        },
        Value::Object(_) => match extract_id(value) {
            Some(id) => OverlayParse {
                overlay: ScheduleOverlay::Single(id),
                skipped: 0,
            },
            // 对象存在但无可用 scheduleId: 字段"被动过"但贡献为空
            None => OverlayParse {
                overlay: ScheduleOverlay::Many(Vec::new()),
                skipped: 1,
            },
        },
        Value::Array(elems) => {
            let mut ids = Vec::new();
            let mut skipped = 0u32;
            for elem in elems {
                match extract_id(elem) {
                    Some(id) => ids.push(id),
                    None => skipped += 1,
                }
            }
            OverlayParse {
                overlay: ScheduleOverlay::Many(ids),
                skipped,
            }
        }
        // 字符串/布尔等形态从未合法出现过, 整体视为畸形
        _ => OverlayParse {
            overlay: ScheduleOverlay::Many(Vec::new()),
            skipped: 1,
        },
    }
}

/// 从单个元素提取调度号: 裸整数或 {scheduleId: n}
fn extract_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::Object(map) => map.get(SCHEDULE_ID_KEY).and_then(Value::as_i64),
        _ => None,
    }
}

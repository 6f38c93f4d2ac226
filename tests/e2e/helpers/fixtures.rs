use serde_json::{json, Value};

pub const LESSON_DATE: &str = "2024-03-08";

/// A complete lesson with Chinese and English text
pub fn lesson_record() -> Value {
    json!({
        "date": LESSON_DATE,
        "topic": {"zh": "复利的力量", "en": "The power of compounding"},
        "summary": {
            "zh": "复利让收益再产生收益。越早开始，时间带来的效果越明显。",
            "en": "Compounding lets returns earn returns. The earlier you start, the more time works for you."
        },
        "key_points": {
            "zh": ["尽早开始", "保持耐心"],
            "en": ["Start early", "Stay patient"]
        },
        "practice": {
            "zh": [{"title": "今天的练习", "steps": ["算一算十年后的余额"]}],
            "en": [{"title": "Today's exercise", "steps": ["Project your balance ten years out"]}]
        },
        "risk_notes": {"zh": "历史收益不代表未来表现。", "en": "Past returns do not guarantee future results."}
    })
}

/// A lesson whose only text is Chinese
pub fn chinese_only_record() -> Value {
    json!({
        "date": LESSON_DATE,
        "title": "分散投资",
        "summary": {"zh": "不要把鸡蛋放在一个篮子里。"}
    })
}

pub fn store(records: Vec<Value>) -> Value {
    Value::Array(records)
}

//! 无类型文档（Document）与字段读取
//!
//! 调用方配置的结构是开放的（新算法/新参数无需修改本库），因此以有序的
//! 键值文档承载，并通过 [`FieldValue`] 能力在读取时完成类型校验。
//!
use crate::error::{DomainError, DomainResult};
use serde_json::{Map, Number, Value};

/// 有序键值文档，未知字段按插入顺序原样往返
pub type Document = Map<String, Value>;

/// 可从文档字段中提取的类型
pub trait FieldValue: Sized {
    /// 期望类型名称，用于错误信息
    const KIND: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for String {
    const KIND: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FieldValue for bool {
    const KIND: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FieldValue for i64 {
    const KIND: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FieldValue for f64 {
    const KIND: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FieldValue for Number {
    const KIND: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.clone()),
            _ => None,
        }
    }
}

impl FieldValue for Document {
    const KIND: &'static str = "object";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl FieldValue for Vec<Value> {
    const KIND: &'static str = "array";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_array().cloned()
    }
}

impl FieldValue for Value {
    const KIND: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// JSON 值的类型名称
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 读取必填字段：缺失或类型不符均报错
pub fn read_value<T: FieldValue>(doc: &Document, key: &str) -> DomainResult<T> {
    let value = doc.get(key).ok_or_else(|| DomainError::MissingField {
        key: key.to_string(),
    })?;
    coerce(key, value)
}

/// 读取可选字段：缺失或为 null 时返回 `None`，仅在类型不符时报错
pub fn read_optional_value<T: FieldValue>(doc: &Document, key: &str) -> DomainResult<Option<T>> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce(key, value).map(Some),
    }
}

fn coerce<T: FieldValue>(key: &str, value: &Value) -> DomainResult<T> {
    T::from_value(value).ok_or_else(|| DomainError::FieldType {
        key: key.to_string(),
        expected: T::KIND,
        found: kind_of(value),
    })
}

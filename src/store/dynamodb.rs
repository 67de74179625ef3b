//! DynamoDB record store.
//!
//! Conditional writes use `attribute_exists` / `attribute_not_exists` on the
//! key attribute; `ConditionalCheckFailedException` maps to
//! [`StoreError::ConditionFailed`].

use std::collections::HashMap;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::codec::{decode_numeric_str, Attribute, CodecError, Item};

use super::errors::{StoreError, StoreResult};
use super::expression::UpdateExpression;
use super::{RecordStore, KEY_ATTRIBUTE};

const KEY_NAME: &str = "#pk";

/// Store backed by a DynamoDB table
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
    key_attribute: String,
}

impl DynamoDbStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            key_attribute: KEY_ATTRIBUTE.to_string(),
        }
    }

    /// Build a client from the ambient AWS configuration
    pub async fn from_env(table_name: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), table_name)
    }

    fn key_value(key: &str) -> AttributeValue {
        AttributeValue::S(key.to_string())
    }
}

impl RecordStore for DynamoDbStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(&self.key_attribute, Self::key_value(key))
            .send()
            .await
            .map_err(backend_error)?;

        output.item().map(from_dynamo_item).transpose()
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        let items: Vec<HashMap<String, AttributeValue>> = self
            .client
            .scan()
            .table_name(&self.table_name)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(backend_error)?;

        items.iter().map(from_dynamo_item).collect()
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        let key = item
            .get(&self.key_attribute)
            .and_then(|k| k.as_str())
            .ok_or_else(|| StoreError::MissingKey(self.key_attribute.clone()))?
            .to_string();

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_dynamo_item(&item)))
            .condition_expression(format!("attribute_not_exists({KEY_NAME})"))
            .expression_attribute_names(KEY_NAME, &self.key_attribute)
            .send()
            .await
            .map_err(|e| write_error(e, &key, PutItemError::is_conditional_check_failed_exception))?;
        Ok(())
    }

    async fn update(&self, key: &str, update: &UpdateExpression) -> StoreResult<()> {
        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(&self.key_attribute, Self::key_value(key))
            .update_expression(update.expression())
            .condition_expression(format!("attribute_exists({KEY_NAME})"))
            .expression_attribute_names(KEY_NAME, &self.key_attribute);

        for (placeholder, value) in update.values() {
            request = request.expression_attribute_values(placeholder, to_dynamo_value(&value));
        }

        request
            .send()
            .await
            .map_err(|e| {
                write_error(e, key, UpdateItemError::is_conditional_check_failed_exception)
            })?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(&self.key_attribute, Self::key_value(key))
            .condition_expression(format!("attribute_exists({KEY_NAME})"))
            .expression_attribute_names(KEY_NAME, &self.key_attribute)
            .send()
            .await
            .map_err(|e| {
                write_error(e, key, DeleteItemError::is_conditional_check_failed_exception)
            })?;
        Ok(())
    }
}

fn backend_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    StoreError::Backend(DisplayErrorContext(&err).to_string())
}

fn write_error<E, R>(err: SdkError<E, R>, key: &str, is_condition: impl Fn(&E) -> bool) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if err.as_service_error().is_some_and(is_condition) {
        return StoreError::condition_failed(key);
    }
    backend_error(err)
}

fn to_dynamo_item(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(k, v)| (k.clone(), to_dynamo_value(v)))
        .collect()
}

fn to_dynamo_value(attribute: &Attribute) -> AttributeValue {
    match attribute {
        Attribute::Null => AttributeValue::Null(true),
        Attribute::Bool(b) => AttributeValue::Bool(*b),
        Attribute::String(s) => AttributeValue::S(s.clone()),
        Attribute::Number(d) => AttributeValue::N(d.normalize().to_string()),
        Attribute::List(items) => AttributeValue::L(items.iter().map(to_dynamo_value).collect()),
        Attribute::Map(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_dynamo_value(v)))
                .collect(),
        ),
    }
}

fn from_dynamo_item(item: &HashMap<String, AttributeValue>) -> StoreResult<Item> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), from_dynamo_value(v)?)))
        .collect()
}

fn from_dynamo_value(value: &AttributeValue) -> StoreResult<Attribute> {
    Ok(match value {
        AttributeValue::Null(_) => Attribute::Null,
        AttributeValue::Bool(b) => Attribute::Bool(*b),
        AttributeValue::S(s) => Attribute::String(s.clone()),
        AttributeValue::N(n) => Attribute::Number(decode_numeric_str(n)?),
        AttributeValue::Ss(values) => {
            Attribute::List(values.iter().cloned().map(Attribute::String).collect())
        }
        AttributeValue::Ns(values) => Attribute::List(
            values
                .iter()
                .map(|n| decode_numeric_str(n).map(Attribute::Number))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::L(items) => Attribute::List(
            items
                .iter()
                .map(from_dynamo_value)
                .collect::<StoreResult<Vec<_>>>()?,
        ),
        AttributeValue::M(map) => Attribute::Map(from_dynamo_item(map)?),
        _ => {
            return Err(CodecError::UnsupportedValue("binary or unknown attribute".to_string()).into())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_value_conversion_keeps_decimals_exact() {
        let attr = Attribute::Number(Decimal::new(810, 2));
        let dynamo = to_dynamo_value(&attr);
        assert_eq!(dynamo, AttributeValue::N("8.1".to_string()));
        assert_eq!(
            from_dynamo_value(&dynamo).unwrap(),
            Attribute::Number(Decimal::new(81, 1))
        );
    }

    #[test]
    fn test_item_conversion() {
        let mut item = Item::new();
        item.insert("movieId".to_string(), Attribute::from("m-1"));
        item.insert(
            "tags".to_string(),
            Attribute::List(vec![Attribute::from("a"), Attribute::Null]),
        );

        let dynamo = to_dynamo_item(&item);
        assert_eq!(dynamo["movieId"], AttributeValue::S("m-1".to_string()));
        assert_eq!(from_dynamo_item(&dynamo).unwrap(), item);
    }

    #[test]
    fn test_number_set_becomes_list() {
        let value = AttributeValue::Ns(vec!["1".to_string(), "2.5".to_string()]);
        assert_eq!(
            from_dynamo_value(&value).unwrap(),
            Attribute::List(vec![
                Attribute::Number(Decimal::from(1)),
                Attribute::Number(Decimal::new(25, 1)),
            ])
        );
    }

    #[test]
    fn test_binary_is_unsupported() {
        let value = AttributeValue::B(aws_sdk_dynamodb::primitives::Blob::new(vec![1, 2]));
        assert!(matches!(
            from_dynamo_value(&value),
            Err(StoreError::Codec(CodecError::UnsupportedValue(_)))
        ));
    }
}

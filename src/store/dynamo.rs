use crate::error::StoreError;
use crate::model::Entity;
use crate::store::EntityStore;
use async_trait::async_trait;
use aws_sdk_dynamodb::{error::DisplayErrorContext, types::AttributeValue, Client};
use std::collections::HashMap;

type Item = HashMap<String, AttributeValue>;

/// DynamoDB table with a single string partition key.
pub struct DynamoStore {
    client: Client,
    table_name: String,
    key_field: String,
}

impl DynamoStore {
    pub fn new(client: Client, table_name: impl Into<String>, key_field: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            key_field: key_field.into(),
        }
    }

    /// Client from the default AWS credential/region chain, optionally pointed at a local endpoint.
    pub async fn connect(table_name: &str, key_field: &str, endpoint: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(url) = endpoint {
            loader = loader.endpoint_url(url);
        }
        let config = loader.load().await;
        Self::new(Client::new(&config), table_name, key_field)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn key_of(key_field: &str, id: &str) -> Item {
    HashMap::from([(key_field.to_string(), AttributeValue::S(id.to_string()))])
}

fn encode(entity: &Entity) -> Result<Item, StoreError> {
    Ok(serde_dynamo::to_item(entity)?)
}

fn decode(item: Item) -> Result<Entity, StoreError> {
    Ok(serde_dynamo::from_item(item)?)
}

fn sdk_error<E: std::error::Error + 'static>(err: E) -> StoreError {
    StoreError::Dynamo(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl EntityStore for DynamoStore {
    async fn scan_all(&self) -> Result<Vec<Entity>, StoreError> {
        let mut entities = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0u32;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(sdk_error)?;
            pages += 1;
            for item in output.items.unwrap_or_default() {
                entities.push(decode(item)?);
            }
            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        tracing::debug!(table = %self.table_name, pages, count = entities.len(), "scan");
        Ok(entities)
    }

    async fn get(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_of(&self.key_field, id)))
            .send()
            .await
            .map_err(sdk_error)?;
        output.item.map(decode).transpose()
    }

    async fn put(&self, entity: &Entity) -> Result<(), StoreError> {
        if entity.id(&self.key_field).is_none() {
            return Err(StoreError::MissingKey(self.key_field.clone()));
        }
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(encode(entity)?))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_of(&self.key_field, id)))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }
}

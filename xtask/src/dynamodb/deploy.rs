//! Table deployment operations (Imperative Shell).

use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, CreateGlobalSecondaryIndexAction, GlobalSecondaryIndex,
    GlobalSecondaryIndexUpdate, KeySchemaElement, KeyType, Projection, ProjectionType,
    ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;

use super::client;
use super::config::{AttributeType, GsiConfig, KeyAttribute, TableConfig};
use super::error::{DynamodbError, Result};
use super::planning::{DeployPlan, DestroyPlan};

/// Execute a deploy plan.
pub async fn execute_deploy_plan(client: &Client, plan: &DeployPlan) -> Result<()> {
    match plan {
        DeployPlan::CreateTable { config } => {
            create_table(client, config).await?;
            wait_for_table_active(client, &config.table_name).await?;
        }
        DeployPlan::AddGsis {
            table_name,
            gsis_to_add,
        } => {
            // DynamoDB accepts one index creation per UpdateTable call.
            for gsi in gsis_to_add {
                add_gsi(client, table_name, gsi).await?;
                wait_for_table_active(client, table_name).await?;
            }
        }
        DeployPlan::NoChanges { .. } => {}
    }
    Ok(())
}

/// Execute a destroy plan.
pub async fn execute_destroy_plan(client: &Client, plan: &DestroyPlan) -> Result<()> {
    if let DestroyPlan::DeleteTable { table_name } = plan {
        client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| DynamodbError::sdk(format!("{:?}", e)))?;
    }
    Ok(())
}

async fn create_table(client: &Client, config: &TableConfig) -> Result<()> {
    let mut attribute_definitions = Vec::new();
    for key in table_keys(config) {
        // Key attributes shared between table and index are declared once.
        if !attribute_definitions
            .iter()
            .any(|a: &AttributeDefinition| a.attribute_name() == key.name)
        {
            attribute_definitions.push(attribute_definition(key)?);
        }
    }

    let mut request = client
        .create_table()
        .table_name(&config.table_name)
        .set_key_schema(Some(key_schema(&config.partition_key, config.sort_key.as_ref())?))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest);

    for gsi in &config.gsis {
        request = request.global_secondary_indexes(
            GlobalSecondaryIndex::builder()
                .index_name(&gsi.name)
                .set_key_schema(Some(key_schema(&gsi.partition_key, gsi.sort_key.as_ref())?))
                .projection(project_all())
                .build()
                .map_err(DynamodbError::sdk)?,
        );
    }

    request
        .send()
        .await
        .map_err(|e| DynamodbError::sdk(format!("{:?}", e)))?;
    Ok(())
}

async fn add_gsi(client: &Client, table_name: &str, gsi: &GsiConfig) -> Result<()> {
    let mut attribute_definitions = vec![attribute_definition(&gsi.partition_key)?];
    if let Some(sk) = &gsi.sort_key {
        attribute_definitions.push(attribute_definition(sk)?);
    }

    client
        .update_table()
        .table_name(table_name)
        .set_attribute_definitions(Some(attribute_definitions))
        .global_secondary_index_updates(
            GlobalSecondaryIndexUpdate::builder()
                .create(
                    CreateGlobalSecondaryIndexAction::builder()
                        .index_name(&gsi.name)
                        .set_key_schema(Some(key_schema(&gsi.partition_key, gsi.sort_key.as_ref())?))
                        .projection(project_all())
                        .build()
                        .map_err(DynamodbError::sdk)?,
                )
                .build(),
        )
        .send()
        .await
        .map_err(|e| DynamodbError::sdk(format!("{:?}", e)))?;

    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    let max_attempts = 60;
    let delay = Duration::from_secs(2);

    for _ in 0..max_attempts {
        if let Some(state) = client::get_table_state(client, table_name).await? {
            if state.is_ready() {
                return Ok(());
            }
        }
        tokio::time::sleep(delay).await;
    }

    Err(DynamodbError::TableActivationTimeout {
        table_name: table_name.to_string(),
    })
}

/// Every key attribute a table declares, its indexes included.
fn table_keys(config: &TableConfig) -> impl Iterator<Item = &KeyAttribute> {
    std::iter::once(&config.partition_key)
        .chain(config.sort_key.as_ref())
        .chain(
            config
                .gsis
                .iter()
                .flat_map(|gsi| std::iter::once(&gsi.partition_key).chain(gsi.sort_key.as_ref())),
        )
}

fn key_schema(
    partition_key: &KeyAttribute,
    sort_key: Option<&KeyAttribute>,
) -> Result<Vec<KeySchemaElement>> {
    let mut schema = vec![key_element(partition_key, KeyType::Hash)?];
    if let Some(sk) = sort_key {
        schema.push(key_element(sk, KeyType::Range)?);
    }
    Ok(schema)
}

fn key_element(key: &KeyAttribute, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(&key.name)
        .key_type(key_type)
        .build()
        .map_err(DynamodbError::sdk)
}

fn attribute_definition(key: &KeyAttribute) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(&key.name)
        .attribute_type(to_scalar_type(key.attribute_type))
        .build()
        .map_err(DynamodbError::sdk)
}

fn project_all() -> Projection {
    Projection::builder()
        .projection_type(ProjectionType::All)
        .build()
}

fn to_scalar_type(attr_type: AttributeType) -> ScalarAttributeType {
    match attr_type {
        AttributeType::String => ScalarAttributeType::S,
    }
}

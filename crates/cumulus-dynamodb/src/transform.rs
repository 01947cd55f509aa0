//! JSON marshallers for DynamoDB item operations.

use crate::models::{
    BatchWriteItemInput, BatchWriteItemOutput, DeleteItemInput, DeleteItemOutput, GetItemInput,
    GetItemOutput, PutItemInput, PutItemOutput,
};
use cumulus_core::json::JsonRequest;
use cumulus_core::AwsService;

impl JsonRequest for BatchWriteItemInput {
    const SERVICE: AwsService = AwsService::DynamoDb;
    const OPERATION: &'static str = "BatchWriteItem";
    type Output = BatchWriteItemOutput;
}

impl JsonRequest for PutItemInput {
    const SERVICE: AwsService = AwsService::DynamoDb;
    const OPERATION: &'static str = "PutItem";
    type Output = PutItemOutput;
}

impl JsonRequest for GetItemInput {
    const SERVICE: AwsService = AwsService::DynamoDb;
    const OPERATION: &'static str = "GetItem";
    type Output = GetItemOutput;
}

impl JsonRequest for DeleteItemInput {
    const SERVICE: AwsService = AwsService::DynamoDb;
    const OPERATION: &'static str = "DeleteItem";
    type Output = DeleteItemOutput;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute_value::{AttributeValue, Item};
    use crate::models::{ReturnConsumedCapacity, ReturnValue, WriteRequest};
    use cumulus_core::json::{marshall, unmarshall_response};
    use cumulus_core::Error;
    use serde_json::{json, Value};

    fn key(id: &str) -> Item {
        Item::from([("id".to_string(), AttributeValue::from(id))])
    }

    fn body(request: &impl JsonRequest) -> Value {
        let request = marshall(request).unwrap();
        serde_json::from_slice(&request.body()).unwrap()
    }

    #[test]
    fn test_batch_write_body() {
        let input = BatchWriteItemInput::new()
            .with_write("Music", WriteRequest::put(key("a")))
            .with_write("Music", WriteRequest::delete(key("b")))
            .with_return_consumed_capacity(ReturnConsumedCapacity::Total);

        let request = marshall(&input).unwrap();
        assert_eq!(
            request.header("X-Amz-Target"),
            Some("DynamoDB_20120810.BatchWriteItem")
        );
        assert_eq!(
            serde_json::from_slice::<Value>(&request.body()).unwrap(),
            json!({
                "RequestItems": {
                    "Music": [
                        {"PutRequest": {"Item": {"id": {"S": "a"}}}},
                        {"DeleteRequest": {"Key": {"id": {"S": "b"}}}}
                    ]
                },
                "ReturnConsumedCapacity": "TOTAL"
            })
        );
    }

    #[test]
    fn test_batch_write_limits() {
        assert!(matches!(
            marshall(&BatchWriteItemInput::new()),
            Err(Error::ValidationError(_))
        ));

        let full = (0..26).fold(BatchWriteItemInput::new(), |input, i| {
            input.with_write("Music", WriteRequest::put(key(&i.to_string())))
        });
        assert_eq!(full.len(), 26);
        assert!(matches!(marshall(&full), Err(Error::ValidationError(_))));

        let neither = BatchWriteItemInput::new().with_write("Music", WriteRequest::default());
        assert!(marshall(&neither).is_err());

        let both = WriteRequest {
            put_request: WriteRequest::put(key("a")).put_request,
            delete_request: WriteRequest::delete(key("a")).delete_request,
        };
        assert!(marshall(&BatchWriteItemInput::new().with_write("Music", both)).is_err());

        let bad_table = BatchWriteItemInput::new().with_write("x", WriteRequest::put(key("a")));
        assert!(marshall(&bad_table).is_err());
    }

    #[test]
    fn test_write_request_ignores_unknown_members() {
        let request: WriteRequest = serde_json::from_value(json!({
            "Unexpected": {"Nested": [1, 2, 3]},
            "DeleteRequest": {"Key": {"id": {"N": "7"}}}
        }))
        .unwrap();
        assert!(request.put_request.is_none());
        assert_eq!(
            request.delete_request.unwrap().key["id"],
            AttributeValue::number(7)
        );
    }

    #[test]
    fn test_put_item_body_skips_unset_fields() {
        let input = PutItemInput::new("Music", key("a"))
            .with_condition_expression("attribute_not_exists(#id)")
            .with_expression_attribute_name("#id", "id")
            .with_return_values(ReturnValue::AllOld);

        assert_eq!(
            body(&input),
            json!({
                "TableName": "Music",
                "Item": {"id": {"S": "a"}},
                "ConditionExpression": "attribute_not_exists(#id)",
                "ExpressionAttributeNames": {"#id": "id"},
                "ReturnValues": "ALL_OLD"
            })
        );
        assert!(marshall(&PutItemInput::new("Music", Item::new())).is_err());
    }

    #[test]
    fn test_get_item_output_without_item() {
        let output = unmarshall_response::<GetItemOutput>(b"{}", Some("R1".into())).unwrap();
        assert_eq!(output.request_id(), Some("R1"));
        assert_eq!(output.output().item, None);

        let output = unmarshall_response::<GetItemOutput>(
            br#"{"Item":{"id":{"S":"a"},"plays":{"N":"12"}},"ConsumedCapacity":{"TableName":"Music","CapacityUnits":0.5}}"#,
            None,
        )
        .unwrap()
        .into_output();
        assert_eq!(output.item.unwrap()["plays"].as_n(), Some("12"));
        assert_eq!(output.consumed_capacity.unwrap().capacity_units, Some(0.5));
    }

    #[test]
    fn test_batch_write_output_reads_unprocessed_items() {
        let output = unmarshall_response::<BatchWriteItemOutput>(
            br#"{
                "UnprocessedItems": {"Music": [{"PutRequest": {"Item": {"id": {"S": "z"}}}}]},
                "ConsumedCapacity": [{"TableName": "Music", "CapacityUnits": 2.0}]
            }"#,
            None,
        )
        .unwrap()
        .into_output();

        assert_eq!(output.unprocessed_items["Music"], vec![WriteRequest::put(key("z"))]);
        assert_eq!(output.consumed_capacity.len(), 1);
    }

    #[test]
    fn test_delete_item_key_size() {
        let three = Item::from([
            ("a".to_string(), AttributeValue::from("1")),
            ("b".to_string(), AttributeValue::from("2")),
            ("c".to_string(), AttributeValue::from("3")),
        ]);
        assert!(marshall(&DeleteItemInput::new("Music", three)).is_err());
        assert!(marshall(&DeleteItemInput::new("Music", key("a"))).is_ok());
    }
}

use crate::{
    CLUSTER_FIELDS, ClusterMetricsClient, CollectorError, EventAssembler, FieldWarningReason,
    MetricValue, RawStatusDocument,
};
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const SAMPLE_RESPONSE: &str = include_str!("sample_response.json");

fn sample_document() -> Value {
    serde_json::from_str(SAMPLE_RESPONSE).unwrap()
}

fn create_test_client(mock_server: &MockServer) -> ClusterMetricsClient {
    ClusterMetricsClient::builder()
        .endpoint(mock_server.uri())
        .build()
        .unwrap()
}

async fn mount_status(mock_server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/pools/default"))
        .respond_with(template)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_fetch_event_contents() {
    let mock_server = MockServer::start().await;
    mount_status(
        &mock_server,
        ResponseTemplate::new(200)
            .insert_header("Content-Type", "application/json;")
            .set_body_string(SAMPLE_RESPONSE),
    )
    .await;

    let client = create_test_client(&mock_server);
    let assembled = client.collect().await.unwrap();
    assert!(assembled.is_complete(), "{:?}", assembled.warnings);

    let event = &assembled.event;
    let leaf = |p: &[&str]| event.get(p).cloned();

    assert_eq!(leaf(&["hdd", "free", "bytes"]), Some(MetricValue::Bytes(46902679716)));
    assert_eq!(leaf(&["hdd", "total", "bytes"]), Some(MetricValue::Bytes(63381999616)));
    assert_eq!(
        leaf(&["hdd", "used", "value", "bytes"]),
        Some(MetricValue::Bytes(16479319900))
    );
    assert_eq!(
        leaf(&["hdd", "used", "by_data", "bytes"]),
        Some(MetricValue::Bytes(16369010))
    );
    assert_eq!(
        leaf(&["hdd", "quota", "total", "bytes"]),
        Some(MetricValue::Bytes(63381999616))
    );
    assert_eq!(leaf(&["max_bucket_count"]), Some(MetricValue::Count(10)));
    assert_eq!(
        leaf(&["quota", "index_memory", "mb"]),
        Some(MetricValue::Megabytes(300))
    );
    assert_eq!(leaf(&["quota", "memory", "mb"]), Some(MetricValue::Megabytes(300)));
    assert_eq!(
        leaf(&["ram", "quota", "total", "value", "bytes"]),
        Some(MetricValue::Bytes(314572800))
    );
    assert_eq!(
        leaf(&["ram", "quota", "total", "per_node", "bytes"]),
        Some(MetricValue::Bytes(314572800))
    );
    assert_eq!(
        leaf(&["ram", "quota", "used", "value", "bytes"]),
        Some(MetricValue::Bytes(104857600))
    );
    assert_eq!(
        leaf(&["ram", "quota", "used", "per_node", "bytes"]),
        Some(MetricValue::Bytes(104857600))
    );
    assert_eq!(leaf(&["ram", "total", "bytes"]), Some(MetricValue::Bytes(8359174144)));
    assert_eq!(
        leaf(&["ram", "used", "value", "bytes"]),
        Some(MetricValue::Bytes(8004751360))
    );
    assert_eq!(
        leaf(&["ram", "used", "by_data", "bytes"]),
        Some(MetricValue::Bytes(53962016))
    );
}

#[tokio::test]
async fn test_event_shape_matches_field_table() {
    let mock_server = MockServer::start().await;
    mount_status(
        &mock_server,
        ResponseTemplate::new(200).set_body_string(SAMPLE_RESPONSE),
    )
    .await;

    let assembled = create_test_client(&mock_server).collect().await.unwrap();

    assert_eq!(
        assembled.event.to_json(),
        serde_json::json!({
            "hdd": {
                "free": {"bytes": 46902679716_u64},
                "total": {"bytes": 63381999616_u64},
                "used": {"value": {"bytes": 16479319900_u64}, "by_data": {"bytes": 16369010}},
                "quota": {"total": {"bytes": 63381999616_u64}}
            },
            "max_bucket_count": 10,
            "quota": {"index_memory": {"mb": 300}, "memory": {"mb": 300}},
            "ram": {
                "quota": {
                    "total": {"value": {"bytes": 314572800}, "per_node": {"bytes": 314572800}},
                    "used": {"value": {"bytes": 104857600}, "per_node": {"bytes": 104857600}}
                },
                "total": {"bytes": 8359174144_u64},
                "used": {"value": {"bytes": 8004751360_u64}, "by_data": {"bytes": 53962016}}
            }
        })
    );

    // Top-level keys follow first insertion, not alphabetical order.
    let keys: Vec<&str> = assembled.event.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["hdd", "max_bucket_count", "quota", "ram"]);

    let destinations: Vec<String> = CLUSTER_FIELDS.iter().map(|f| f.destination_path()).collect();
    let flattened: Vec<String> = assembled
        .event
        .flatten()
        .into_iter()
        .map(|(p, _)| p)
        .collect();
    assert_eq!(flattened, destinations);
}

#[test]
fn test_assembly_is_deterministic() {
    let document = RawStatusDocument::from_slice(SAMPLE_RESPONSE.as_bytes()).unwrap();
    let assembler = EventAssembler::new();

    let first = assembler.assemble(&document);
    let second = assembler.assemble(&document);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first.event).unwrap(),
        serde_json::to_vec(&second.event).unwrap()
    );
}

#[test]
fn test_removing_one_leaf_removes_only_its_destination() {
    let assembler = EventAssembler::new();
    let complete = assembler.assemble(&RawStatusDocument::from_value(sample_document()).unwrap());

    for field in CLUSTER_FIELDS {
        let mut value = sample_document();
        let (leaf, parents) = field.source.split_last().unwrap();
        let mut parent = &mut value;
        for segment in parents {
            parent = parent.get_mut(*segment).unwrap();
        }
        parent.as_object_mut().unwrap().remove(*leaf);

        let assembled = assembler.assemble(&RawStatusDocument::from_value(value).unwrap());

        assert_eq!(assembled.warnings.len(), 1, "{}", field.source_path());
        let warning = &assembled.warnings[0];
        assert_eq!(warning.source_path, field.source_path());
        assert_eq!(warning.destination_path, field.destination_path());
        assert_eq!(
            warning.reason,
            FieldWarningReason::Missing {
                segment: leaf.to_string()
            }
        );

        assert!(assembled.event.get(field.destination).is_none());
        let expected: Vec<_> = complete
            .event
            .flatten()
            .into_iter()
            .filter(|(p, _)| *p != field.destination_path())
            .collect();
        assert_eq!(assembled.event.flatten(), expected);
    }
}

#[tokio::test]
async fn test_negative_value_degrades_to_partial_event() {
    let mut document = sample_document();
    document["storageTotals"]["ram"]["used"] = serde_json::json!(-1);

    let mock_server = MockServer::start().await;
    mount_status(&mock_server, ResponseTemplate::new(200).set_body_json(document)).await;

    let assembled = create_test_client(&mock_server).collect().await.unwrap();

    assert_eq!(assembled.warnings.len(), 1);
    assert!(matches!(
        assembled.warnings[0].reason,
        FieldWarningReason::Invalid(_)
    ));
    assert!(assembled.event.get(&["ram", "used", "value", "bytes"]).is_none());
    assert_eq!(
        assembled.event.get(&["ram", "used", "by_data", "bytes"]),
        Some(&MetricValue::Bytes(53962016))
    );
}

#[tokio::test]
async fn test_malformed_root_is_decode_error() {
    for body in [r#""not-json""#, "not-json", "[1, 2, 3]"] {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, ResponseTemplate::new(200).set_body_string(body)).await;

        let result = create_test_client(&mock_server).collect().await;
        assert!(
            matches!(result, Err(CollectorError::Decode(_))),
            "body {:?} should fail decoding",
            body
        );
    }
}

#[tokio::test]
async fn test_http_error_is_fetch_error() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, ResponseTemplate::new(401)).await;

    let result = create_test_client(&mock_server).collect().await;
    assert!(matches!(result, Err(CollectorError::Fetch(_))));
}

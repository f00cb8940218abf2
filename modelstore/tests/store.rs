//! End-to-end tests of the storage facade over the in-memory backend.

use chrono::{TimeZone, Utc};
use futures::TryStreamExt;
use modelstore::{
    bson::doc,
    memory::InMemoryBackend,
    prelude::*,
};

fn model() -> Model {
    Model::new([
        EntityDescription::new("Person")
            .with_attribute("name", AttributeType::String)
            .with_attribute("age", AttributeType::Int16)
            .with_relationship("events", RelationshipType::ToMany),
        EntityDescription::new("Event")
            .with_attribute("name", AttributeType::String)
            .with_attribute("date", AttributeType::Date)
            .with_relationship("people", RelationshipType::ToMany),
    ])
}

fn store() -> ModelStore<InMemoryBackend> {
    ModelStore::new(InMemoryBackend::new(), model())
}

fn person(id: &str, name: &str, age: i16) -> ModelData {
    ModelData::new("Person", id)
        .with_attribute("name", AttributeValue::String(name.into()))
        .with_attribute("age", AttributeValue::Int16(age))
        .with_relationship("events", RelationshipValue::Null)
}

#[tokio::test]
async fn inserted_record_fetches_back_by_identity() {
    let store = store();
    let record = ModelData::new("Person", "p1").with_attribute("age", AttributeValue::Int16(22));
    store.insert(&record).await.unwrap();

    let fetched = store
        .fetch_by_id("Person", &ObjectID::from("p1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.attribute("age"), Some(&AttributeValue::Int16(22)));
    assert_eq!(fetched.id, ObjectID::from("p1"));
    // Members the record never carried decode as null.
    assert_eq!(fetched.attribute("name"), Some(&AttributeValue::Null));
}

#[tokio::test]
async fn fetching_an_absent_identity_is_not_an_error() {
    let store = store();
    let fetched = store.fetch_by_id("Person", &ObjectID::from("nobody")).await.unwrap();
    assert!(fetched.is_none());
}

#[tokio::test]
async fn to_many_relationships_preserve_inserted_order() {
    let store = store();
    let first = person("p1", "Jane", 22).with_relationship(
        "events",
        RelationshipValue::ToMany(vec![ObjectID::from("e1")]),
    );
    let second = person("p2", "John", 30).with_relationship(
        "events",
        RelationshipValue::ToMany(vec![ObjectID::from("e1"), ObjectID::from("e2")]),
    );
    store.insert_batch(&[first, second]).await.unwrap();

    let fetched = store.fetch_by_id("Person", &ObjectID::from("p1")).await.unwrap().unwrap();
    assert_eq!(
        fetched.relationship("events"),
        Some(&RelationshipValue::ToMany(vec![ObjectID::from("e1")])),
    );
    let fetched = store.fetch_by_id("Person", &ObjectID::from("p2")).await.unwrap().unwrap();
    assert_eq!(
        fetched.relationship("events"),
        Some(&RelationshipValue::ToMany(vec![
            ObjectID::from("e1"),
            ObjectID::from("e2"),
        ])),
    );
}

#[tokio::test]
async fn mutual_relationships_survive_a_round_trip() {
    let store = store();
    let date = Utc.with_ymd_and_hms(2023, 8, 27, 10, 0, 0).unwrap();
    let event = ModelData::new("Event", "e1")
        .with_attribute("name", AttributeValue::String("WWDC".into()))
        .with_attribute("date", AttributeValue::Date(date))
        .with_relationship("people", RelationshipValue::ToMany(vec![ObjectID::from("p1")]));
    let person = person("p1", "John Appleseed", 22).with_relationship(
        "events",
        RelationshipValue::ToMany(vec![ObjectID::from("e1")]),
    );
    store.insert(&event).await.unwrap();
    store.insert(&person).await.unwrap();

    let person = store.fetch_by_id("Person", &ObjectID::from("p1")).await.unwrap().unwrap();
    assert_eq!(
        person.relationship("events"),
        Some(&RelationshipValue::ToMany(vec![ObjectID::from("e1")])),
    );
    let event = store.fetch_by_id("Event", &ObjectID::from("e1")).await.unwrap().unwrap();
    assert_eq!(
        event.relationship("people"),
        Some(&RelationshipValue::ToMany(vec![ObjectID::from("p1")])),
    );
    assert_eq!(event.attribute("date"), Some(&AttributeValue::Date(date)));
}

#[tokio::test]
async fn predicate_fetch_filters_records() {
    let store = store();
    store
        .insert_batch(&[
            person("p1", "Jane", 22),
            person("p2", "Jane", 12),
            person("p3", "John", 40),
        ])
        .await
        .unwrap();

    let request = FetchRequest::builder("Person")
        .filter(
            Filter::gte("age", AttributeValue::Int16(18))
                .and(Filter::eq("name", AttributeValue::String("Jane".into()))),
        )
        .build();
    let fetched = store.fetch(&request).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, ObjectID::from("p1"));

    assert_eq!(store.count(&request).await.unwrap(), 1);
}

#[tokio::test]
async fn sort_limit_and_offset_page_through_records() {
    let store = store();
    store
        .insert_batch(&[
            person("p1", "Ada", 35),
            person("p2", "Byron", 28),
            person("p3", "Clara", 41),
            person("p4", "Dan", 19),
        ])
        .await
        .unwrap();

    let request = FetchRequest::builder("Person")
        .sort(SortDescriptor::ascending("age"))
        .offset(1)
        .limit(2)
        .build();
    let fetched = store.fetch(&request).await.unwrap();
    let names: Vec<_> = fetched
        .iter()
        .map(|record| record.attribute("name").cloned().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            AttributeValue::String("Byron".into()),
            AttributeValue::String("Ada".into()),
        ],
    );
}

#[tokio::test]
async fn fetch_stream_yields_records_lazily() {
    let store = store();
    store
        .insert_batch(&[person("p1", "Jane", 22), person("p2", "John", 30)])
        .await
        .unwrap();

    let request = FetchRequest::builder("Person")
        .sort(SortDescriptor::descending("age"))
        .build();
    let stream = store.fetch_stream(&request).await.unwrap();
    let records: Vec<ModelData> = stream.try_collect().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, ObjectID::from("p2"));
}

#[tokio::test]
async fn insert_replaces_an_existing_record_by_identity() {
    let store = store();
    store.insert(&person("p1", "Jane", 22)).await.unwrap();
    store.insert(&person("p1", "Jane", 23)).await.unwrap();

    let fetched = store.fetch_by_id("Person", &ObjectID::from("p1")).await.unwrap().unwrap();
    assert_eq!(fetched.attribute("age"), Some(&AttributeValue::Int16(23)));
    assert_eq!(store.count(&FetchRequest::new("Person")).await.unwrap(), 1);
}

#[tokio::test]
async fn batch_insert_routes_records_to_their_entities() {
    let store = store();
    let date = Utc.with_ymd_and_hms(2023, 8, 27, 10, 0, 0).unwrap();
    let event = ModelData::new("Event", "e1")
        .with_attribute("name", AttributeValue::String("WWDC".into()))
        .with_attribute("date", AttributeValue::Date(date))
        .with_relationship("people", RelationshipValue::Null);
    store
        .insert_batch(&[person("p1", "Jane", 22), event, person("p2", "John", 30)])
        .await
        .unwrap();

    assert_eq!(store.count(&FetchRequest::new("Person")).await.unwrap(), 2);
    assert_eq!(store.count(&FetchRequest::new("Event")).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_twice_is_idempotent() {
    let store = store();
    store.insert(&person("p1", "Jane", 22)).await.unwrap();

    store.delete("Person", &ObjectID::from("p1")).await.unwrap();
    assert!(store.fetch_by_id("Person", &ObjectID::from("p1")).await.unwrap().is_none());
    store.delete("Person", &ObjectID::from("p1")).await.unwrap();
    assert!(store.fetch_by_id("Person", &ObjectID::from("p1")).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_entities_are_rejected() {
    let store = store();
    let result = store.fetch_by_id("Campground", &ObjectID::from("c1")).await;
    assert!(matches!(result, Err(ModelStoreError::UnknownEntity(name)) if name == "Campground"));
    let result = store
        .insert(&ModelData::new("Campground", "c1"))
        .await;
    assert!(matches!(result, Err(ModelStoreError::UnknownEntity(_))));
}

#[tokio::test]
async fn inexpressible_predicates_fail_the_fetch() {
    let store = store();
    store.insert(&person("p1", "Jane", 22)).await.unwrap();

    let request = FetchRequest::builder("Person")
        .filter(Filter::eq("name", AttributeValue::String("Jane".into())).not())
        .build();
    assert!(matches!(
        store.fetch(&request).await,
        Err(ModelStoreError::UnsupportedPredicate),
    ));
    assert!(matches!(
        store.count(&request).await,
        Err(ModelStoreError::UnsupportedPredicate),
    ));
}

#[tokio::test]
async fn malformed_stored_documents_fail_to_decode() {
    let backend = InMemoryBackend::new();
    let store = ModelStore::new(backend.clone(), model());
    // A stored document holding a string where the schema declares int16.
    backend
        .collection("persons")
        .insert_one(doc! { "_id": "p1", "name": "Jane", "age": "old" })
        .await
        .unwrap();

    let result = store.fetch_by_id("Person", &ObjectID::from("p1")).await;
    match result {
        Err(ModelStoreError::AttributeTypeMismatch { entity, attribute, .. }) => {
            assert_eq!(entity, "Person");
            assert_eq!(attribute, "age");
        }
        other => panic!("expected attribute mismatch, got {other:?}"),
    }

    // One malformed document fails a whole fetch, not just its own slot.
    store.insert(&person("p2", "John", 30)).await.unwrap();
    assert!(store.fetch(&FetchRequest::new("Person")).await.is_err());
}

/* tests/engine_tests.rs */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ghii::loader::StaticLoader;
use ghii::{ChangeKind, EngineError, EventKind, FailurePolicy, Field, Ghii, LoadError, SectionSchema, Tree};
use serde_json::{Value, json};

fn tree(value: Value) -> Tree {
	match value {
		Value::Object(map) => map,
		other => panic!("expected an object, got {}", other),
	}
}

fn ok(value: Value) -> Result<Tree, LoadError> {
	Ok(tree(value))
}

fn fail(message: &str) -> Result<Tree, LoadError> {
	Err(LoadError::Custom(message.to_string()))
}

fn prop_section(default: Option<&str>) -> Field {
	let field = Field::object().field("prop", Field::string().required());
	match default {
		Some(prop) => field.with_default(json!({ "prop": prop })),
		None => field,
	}
}

#[tokio::test]
async fn test_defaults_merged_with_loader() -> Result<(), EngineError> {
	let schema = SectionSchema::new()
		.section("foo", prop_section(Some("ciao")))
		.section("foo2", prop_section(Some("ciao")))
		.section(
			"s3",
			Field::object()
				.field("url", Field::string().required())
				.with_default(json!({ "ciao": "world" })),
		);

	let ghii = Ghii::builder(schema)
		.loader_fn(|| async { ok(json!({ "s3": { "url": "ciao" } })) })
		.build()?;

	let result = ghii.take_snapshot().await?;
	assert_eq!(
		Value::Object(result),
		json!({
			"foo": { "prop": "ciao" },
			"foo2": { "prop": "ciao" },
			"s3": { "ciao": "world", "url": "ciao" },
		})
	);
	assert_eq!(ghii.history().len(), 1);
	Ok(())
}

#[tokio::test]
async fn test_loader_without_defaults() -> Result<(), EngineError> {
	let ghii = Ghii::builder(SectionSchema::new().section("foo", prop_section(None)))
		.loader_fn(|| async { ok(json!({ "foo": { "prop": "ciao" } })) })
		.build()?;

	let result = ghii.take_snapshot().await?;
	assert_eq!(Value::Object(result), json!({ "foo": { "prop": "ciao" } }));
	Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_merge_precedence_ignores_completion_order() -> Result<(), EngineError> {
	let schema = SectionSchema::new()
		.section("a", Field::integer().with_default(json!(1)))
		.section("b", Field::integer().with_default(json!(1)));

	let ghii = Ghii::builder(schema)
		.loader_fn(|| async {
			tokio::time::sleep(Duration::from_millis(20)).await;
			ok(json!({ "b": 2 }))
		})
		.loader_fn(|| async { ok(json!({ "b": 3, "c": 1 })) })
		.build()?;

	let result = ghii.take_snapshot().await?;
	assert_eq!(Value::Object(result), json!({ "a": 1, "b": 3, "c": 1 }));
	Ok(())
}

#[tokio::test]
async fn test_invalid_snapshot_is_not_published() -> Result<(), EngineError> {
	let schema = SectionSchema::new().section(
		"foo",
		Field::object()
			.field("prop", Field::string().length(7, 7).required())
			.with_default(json!({ "prop": "goodbye" })),
	);
	let ghii = Ghii::builder(schema)
		.loader_fn(|| async { ok(json!({ "foo": { "prop": "ciao" } })) })
		.build()?;

	let events = Arc::new(AtomicUsize::new(0));
	let counter = events.clone();
	ghii.on_first(move || {
		counter.fetch_add(1, Ordering::SeqCst);
	});
	let counter = events.clone();
	ghii.on_new(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	let err = ghii.take_snapshot().await.unwrap_err();
	let violations = err.violations().expect("validation error");
	assert_eq!(violations.len(), 1);
	assert_eq!(violations[0].path, "foo.prop");
	assert_eq!(violations[0].value, json!("ciao"));

	assert!(ghii.history().is_empty());
	assert!(ghii.latest_version().is_none());
	assert_eq!(events.load(Ordering::SeqCst), 0);
	Ok(())
}

#[tokio::test]
async fn test_invalid_defaults_are_rejected() -> Result<(), EngineError> {
	let schema = SectionSchema::new().section(
		"foo",
		Field::object()
			.field("prop", Field::string().length(10, 10))
			.with_default(json!({ "prop": "goodbye" })),
	);
	let ghii = Ghii::new(schema);

	assert!(matches!(ghii.take_snapshot().await, Err(EngineError::Validation(_))));
	Ok(())
}

#[tokio::test]
async fn test_strict_policy_reports_every_loader_failure() -> Result<(), EngineError> {
	let ghii = Ghii::builder(SectionSchema::new())
		.loader_fn(|| async { fail("vault down") })
		.loader_fn(|| async { ok(json!({ "a": 1 })) })
		.loader_fn(|| async { fail("consul down") })
		.build()?;

	let err = ghii.take_snapshot().await.unwrap_err();
	let failures = err.loader_failures().expect("loader failures");
	let indices: Vec<usize> = failures.iter().map(|f| f.index).collect();
	assert_eq!(indices, vec![0, 2]);
	assert!(err.to_string().starts_with("2 loader(s) failed"));
	assert!(ghii.history().is_empty());
	Ok(())
}

#[tokio::test]
async fn test_partial_policy_skips_failed_loaders() -> Result<(), EngineError> {
	let ghii = Ghii::builder(SectionSchema::new().section("a", Field::integer().with_default(json!(0))))
		.failure_policy(FailurePolicy::Partial)
		.loader_fn(|| async { fail("vault down") })
		.loader_fn(|| async { ok(json!({ "b": 2 })) })
		.build()?;

	let result = ghii.take_snapshot().await?;
	assert_eq!(Value::Object(result), json!({ "a": 0, "b": 2 }));
	assert_eq!(ghii.policy(), FailurePolicy::Partial);
	Ok(())
}

#[tokio::test]
async fn test_snapshot_defaults_before_publication() {
	let ghii = Ghii::new(SectionSchema::new().section("a", Field::string().with_default(json!("x"))));

	assert_eq!(Value::Object(ghii.snapshot()), json!({ "a": "x" }));
	assert!(ghii.history().is_empty());
	assert!(ghii.latest_version().is_none());
}

#[test]
fn test_publish_is_idempotent() {
	let ghii = Ghii::new(SectionSchema::new());
	let news = Arc::new(AtomicUsize::new(0));
	let counter = news.clone();
	ghii.on_new(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	ghii.publish(tree(json!({ "a": { "test": "string" } })));
	let current = ghii.publish(tree(json!({ "a": { "test": "string" } })));

	assert_eq!(ghii.history().len(), 1);
	assert_eq!(news.load(Ordering::SeqCst), 1);
	assert_eq!(Value::Object(current), json!({ "a": { "test": "string" } }));
}

#[test]
fn test_first_signal_fires_once() {
	let ghii = Ghii::new(SectionSchema::new());
	let firsts = Arc::new(AtomicUsize::new(0));
	let counter = firsts.clone();
	ghii.on_first(move || {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	ghii.publish(tree(json!({ "v": 1 })));
	ghii.publish(tree(json!({ "v": 2 })));
	ghii.publish(tree(json!({ "v": 1 })));

	assert_eq!(firsts.load(Ordering::SeqCst), 1);
	assert_eq!(ghii.history().len(), 3);
}

#[test]
fn test_events_are_delivered_in_order() {
	let ghii = Ghii::builder(SectionSchema::new())
		.breaking_change("foo", |old, new| old != new)
		.build()
		.unwrap();

	let seen: Arc<Mutex<Vec<EventKind>>> = Arc::default();
	let log = seen.clone();
	ghii.on_breaking(move |_| log.lock().unwrap().push(EventKind::Breaking));
	let log = seen.clone();
	ghii.on_new(move |_| log.lock().unwrap().push(EventKind::New));
	let log = seen.clone();
	ghii.on_first(move || log.lock().unwrap().push(EventKind::First));

	ghii.publish(tree(json!({ "foo": 1 })));
	ghii.publish(tree(json!({ "foo": 2 })));

	assert_eq!(
		*seen.lock().unwrap(),
		vec![EventKind::First, EventKind::New, EventKind::New, EventKind::Breaking]
	);
}

#[test]
fn test_new_event_carries_diff() {
	let ghii = Ghii::new(SectionSchema::new());
	let diffs = Arc::new(Mutex::new(Vec::new()));
	let log = diffs.clone();
	ghii.on_new(move |event| log.lock().unwrap().push((event.version.meta.version, event.diff.clone())));

	ghii.publish(tree(json!({ "a": { "x": 1 } })));
	ghii.publish(tree(json!({ "a": { "x": 2 } })));

	let diffs = diffs.lock().unwrap();
	assert_eq!(diffs.len(), 2);
	assert_eq!(diffs[0].0, 1);
	assert!(diffs[0].1.is_empty());

	let (version, changes) = &diffs[1];
	assert_eq!(*version, 2);
	assert_eq!(changes.len(), 1);
	assert_eq!(changes[0].dotted(), "a.x");
	assert_eq!(changes[0].kind, ChangeKind::Modified);
	assert_eq!(changes[0].old, Some(json!(1)));
	assert_eq!(changes[0].new, Some(json!(2)));
}

#[test]
fn test_breaking_change_predicate() {
	let ghii = Ghii::builder(SectionSchema::new())
		.breaking_change("foo", |old, new| old != new)
		.build()
		.unwrap();

	let breaking = Arc::new(Mutex::new(Vec::new()));
	let log = breaking.clone();
	ghii.on_breaking(move |event| log.lock().unwrap().push(event.clone()));

	ghii.publish(tree(json!({ "foo": { "mode": "a" } })));
	ghii.publish(tree(json!({ "foo": { "mode": "b" } })));
	ghii.publish(tree(json!({ "foo": { "mode": "b" }, "bar": 1 })));

	let breaking = breaking.lock().unwrap();
	assert_eq!(breaking.len(), 1);
	assert_eq!(breaking[0].section, "foo");
	assert_eq!(breaking[0].old, json!({ "mode": "a" }));
	assert_eq!(breaking[0].new, json!({ "mode": "b" }));
}

#[test]
fn test_breaking_change_sees_null_for_missing_section() {
	let ghii = Ghii::builder(SectionSchema::new())
		.breaking_change("foo", |old, new| old.is_null() && !new.is_null())
		.build()
		.unwrap();

	let count = Arc::new(AtomicUsize::new(0));
	let counter = count.clone();
	ghii.on_breaking(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	ghii.publish(tree(json!({ "bar": 1 })));
	ghii.publish(tree(json!({ "bar": 1, "foo": true })));

	assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsubscribe() {
	let ghii = Ghii::new(SectionSchema::new());
	let count = Arc::new(AtomicUsize::new(0));
	let counter = count.clone();
	let id = ghii.on_new(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	ghii.publish(tree(json!({ "v": 1 })));
	assert!(ghii.unsubscribe(id));
	assert!(!ghii.unsubscribe(id));
	ghii.publish(tree(json!({ "v": 2 })));

	assert_eq!(count.load(Ordering::SeqCst), 1);
	assert_eq!(ghii.events().subscriber_count(EventKind::New), 0);
}

#[tokio::test]
async fn test_history_is_monotonic_across_snapshots() -> Result<(), EngineError> {
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let ghii = Ghii::builder(SectionSchema::new())
		.loader_fn(move || {
			let n = counter.fetch_add(1, Ordering::SeqCst);
			async move { ok(json!({ "generation": n / 2 })) }
		})
		.build()?;

	let mut last_len = 0;
	for _ in 0..6 {
		ghii.take_snapshot().await?;
		let history = ghii.history();
		assert!(history.len() >= last_len);
		last_len = history.len();
	}

	let history = ghii.history();
	assert_eq!(history.len(), 3);
	for pair in history.windows(2) {
		assert!(pair[0].meta.timestamp <= pair[1].meta.timestamp);
		assert_ne!(pair[0].value, pair[1].value);
	}
	Ok(())
}

#[tokio::test]
async fn test_register_after_construction() -> Result<(), EngineError> {
	let ghii = Ghii::new(SectionSchema::new());
	ghii.register(StaticLoader::from_value(json!({ "a": 1 })))
		.register(StaticLoader::from_value(json!({ "a": 2 })));

	assert_eq!(ghii.loader_count(), 2);
	assert_eq!(ghii.take_snapshot().await?["a"], json!(2));
	Ok(())
}

#[test]
fn test_builder_rejects_empty_section() {
	let result = Ghii::builder(SectionSchema::new())
		.breaking_change("", |_, _| true)
		.build();
	assert!(matches!(result, Err(EngineError::Builder(_))));
}

#[test]
fn test_history_copies_do_not_alias_engine_state() {
	let ghii = Ghii::new(SectionSchema::new());
	ghii.publish(tree(json!({ "a": 1 })));

	let mut snapshot = ghii.snapshot();
	snapshot.insert("a".to_string(), json!(99));
	let mut history = ghii.history();
	history[0].value.clear();

	assert_eq!(ghii.snapshot()["a"], json!(1));
	assert_eq!(ghii.latest_version().unwrap().value["a"], json!(1));
}

#[cfg(feature = "events")]
#[tokio::test]
async fn test_async_subscription() {
	use ghii::Lifecycle;

	let ghii = Ghii::new(SectionSchema::new());
	let mut rx = ghii.subscribe();

	ghii.publish(tree(json!({ "a": 1 })));

	assert_eq!(rx.recv().await.unwrap(), Lifecycle::First);
	match rx.recv().await.unwrap() {
		Lifecycle::New(event) => assert_eq!(event.version.meta.version, 1),
		other => panic!("Expected New, got {:?}", other),
	}
}

#[tokio::test]
async fn test_non_object_layer_fails_snapshot() {
	let ghii = Ghii::builder(SectionSchema::new())
		.loader(StaticLoader::from_value(json!(["port", 8080])))
		.build()
		.unwrap();

	let err = ghii.take_snapshot().await.unwrap_err();
	let failures = err.loader_failures().expect("loader failures");
	assert!(matches!(failures[0].error, LoadError::NotATree("array")));
	assert!(ghii.history().is_empty());
}

#[test]
fn test_once_subscriptions_fire_once() {
	let ghii = Ghii::builder(SectionSchema::new())
		.breaking_change("foo", |old, new| old != new)
		.build()
		.unwrap();

	let news = Arc::new(Mutex::new(Vec::new()));
	let log = news.clone();
	ghii.once_new(move |event| log.lock().unwrap().push(event.version.meta.version));
	let breaking = Arc::new(AtomicUsize::new(0));
	let counter = breaking.clone();
	ghii.once_breaking(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	ghii.publish(tree(json!({ "foo": 1 })));
	ghii.publish(tree(json!({ "foo": 2 })));
	ghii.publish(tree(json!({ "foo": 3 })));

	assert_eq!(*news.lock().unwrap(), vec![1]);
	assert_eq!(breaking.load(Ordering::SeqCst), 1);
	assert_eq!(ghii.events().subscriber_count(EventKind::New), 0);
	assert_eq!(ghii.events().subscriber_count(EventKind::Breaking), 0);
}

#[test]
fn test_once_subscription_can_be_cancelled() {
	let ghii = Ghii::new(SectionSchema::new());
	let firsts = Arc::new(AtomicUsize::new(0));
	let counter = firsts.clone();
	let id = ghii.once_first(move || {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	assert!(ghii.unsubscribe(id));
	ghii.publish(tree(json!({ "a": 1 })));

	assert_eq!(firsts.load(Ordering::SeqCst), 0);
}

#[test]
fn test_once_delivered_once_under_concurrent_publishes() {
	let ghii = Arc::new(Ghii::new(SectionSchema::new()));
	let deliveries = Arc::new(AtomicUsize::new(0));
	let counter = deliveries.clone();
	ghii.once_new(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	let handles: Vec<_> = (0..8)
		.map(|n| {
			let ghii = ghii.clone();
			std::thread::spawn(move || {
				ghii.publish(tree(json!({ "writer": n })));
			})
		})
		.collect();
	for handle in handles {
		handle.join().unwrap();
	}

	assert_eq!(deliveries.load(Ordering::SeqCst), 1);
}

use sirang::common::Value;
use sirang::doc;
use sirang::errors::ErrorKind;
use sirang::filter::by_id;
use sirang::{CaptureOptions, Document, SirangError};
use sirang_int_test::test_util::{cleanup, create_test_context, run_test};

fn pick_b(params: &Document) -> Result<Value, SirangError> {
    Ok(params.get("b"))
}

#[test]
fn test_capture_keeps_listed_parameters() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let decorator = logger.dstore(
                ctx.db_name(),
                "calls",
                CaptureOptions::new().keep(["a", "b"]).id_template("doc-{}"),
            )?;
            let mut f = decorator.wrap(pick_b)?;

            let result = f.call(doc! { a: 0, b: 1, c: 2, d: 3 })?;
            assert_eq!(result, Value::from(1));

            let stored = logger
                .retrieve_one(ctx.db_name(), "calls", by_id("doc-0"))?
                .expect("call should be recorded");
            assert!(stored.contains_key("a"));
            assert!(stored.contains_key("b"));
            assert!(!stored.contains_key("c"));
            assert!(!stored.contains_key("d"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_capture_inverted_keep() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let decorator = logger.dstore(
                ctx.db_name(),
                "calls",
                CaptureOptions::new()
                    .keep(["a", "b"])
                    .inversion(true)
                    .id_template("doc-{}"),
            )?;
            let mut f = decorator.wrap(pick_b)?;

            let result = f.call(doc! { a: 0, b: 1, c: 2, d: 3 })?;
            assert_eq!(result, Value::from(1));

            let stored = logger
                .retrieve_one(ctx.db_name(), "calls", by_id("doc-0"))?
                .expect("call should be recorded");
            assert!(!stored.contains_key("a"));
            assert!(!stored.contains_key("b"));
            assert_eq!(stored.get("c"), Value::from(2));
            assert_eq!(stored.get("d"), Value::from(3));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_capture_stores_returned_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let decorator = logger.dstore(
                ctx.db_name(),
                "results",
                CaptureOptions::new()
                    .keep(["a", "b", "c", "d"])
                    .store_return(true)
                    .id_template("res_{}")
                    .id_counter(5),
            )?;
            let mut g = decorator.wrap_returning(|params| {
                let mut extra = Document::new();
                extra.put("x", params.get("b"))?;
                Ok::<_, SirangError>((extra, params.get("c")))
            })?;

            let result = g.call(doc! { a: 0, b: 1, c: 2, d: 3 })?;
            assert_eq!(result, Value::from(2));

            let stored = logger
                .retrieve_one(ctx.db_name(), "results", by_id("res_5"))?
                .expect("call should be recorded");
            assert_eq!(stored.get("x"), Value::from(1));
            assert_eq!(stored.get("a"), Value::from(0));
            assert_eq!(stored.get("d"), Value::from(3));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_capture_ids_follow_counter() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let decorator = logger.dstore(
                ctx.db_name(),
                "sweep",
                CaptureOptions::new().id_template("lr-{}").id_counter(10),
            )?;
            let mut f = decorator.wrap(|params| Ok::<_, SirangError>(params.get("lr")))?;

            let rates = [0.1, 0.01, 0.001, 0.0001];
            for lr in rates {
                f.call(doc! { lr: lr })?;
            }
            assert_eq!(f.counter(), 14);

            for (offset, lr) in rates.iter().enumerate() {
                let id = format!("lr-{}", 10 + offset);
                let stored = logger
                    .retrieve_one(ctx.db_name(), "sweep", by_id(id.as_str()))?
                    .expect("every call is recorded");
                assert_eq!(stored.get("lr"), Value::from(*lr));
            }
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "sweep")?, 4);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_capture_counter_shared_by_wrapped_functions() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let decorator = logger.dstore(
                ctx.db_name(),
                "calls",
                CaptureOptions::new().id_template("call-{}"),
            )?;
            let mut train = decorator.wrap(|_| Ok::<_, SirangError>("train"))?;
            let mut evaluate = decorator.wrap(|_| Ok::<_, SirangError>("evaluate"))?;

            train.call(doc! { step: 0 })?;
            evaluate.call(doc! { step: 1 })?;
            train.call(doc! { step: 2 })?;
            assert_eq!(decorator.counter(), 3);

            let second = logger
                .retrieve_one(ctx.db_name(), "calls", by_id("call-1"))?
                .expect("second call recorded");
            assert_eq!(second.get("step"), Value::from(1));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_capture_without_template_uses_store_ids() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let decorator = logger.dstore(ctx.db_name(), "calls", CaptureOptions::new())?;
            let mut f = decorator.wrap(|params| Ok::<_, SirangError>(params.size()))?;

            assert_eq!(f.call(doc! { a: 1, b: 2 })?, 2);
            assert_eq!(f.call(doc! { a: 3 })?, 1);

            let stored = logger.retrieve(ctx.db_name(), "calls", doc! {})?;
            assert_eq!(stored.len(), 2);
            assert!(stored.iter().all(|doc| doc.has_id()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_capture_failed_call_is_not_recorded() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let decorator = logger.dstore(
                ctx.db_name(),
                "calls",
                CaptureOptions::new().id_template("doc-{}"),
            )?;
            let mut f = decorator.wrap(|params| {
                if params.get("diverged").as_bool().unwrap_or(false) {
                    Err(SirangError::new("training diverged", ErrorKind::InternalError))
                } else {
                    Ok(())
                }
            })?;

            assert!(f.call(doc! { diverged: true }).is_err());
            f.call(doc! { diverged: false })?;

            assert_eq!(logger.collection_doc_count(ctx.db_name(), "calls")?, 1);
            assert!(logger.retrieve_one(ctx.db_name(), "calls", by_id("doc-0"))?.is_none());
            assert!(logger.retrieve_one(ctx.db_name(), "calls", by_id("doc-1"))?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_capture_rejects_malformed_template() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx
                .logger()
                .dstore(ctx.db_name(), "calls", CaptureOptions::new().id_template("doc-{}-{}"))
                .err()
                .expect("two slots are rejected");
            assert_eq!(err.kind(), &ErrorKind::InvalidTemplate);
            Ok(())
        },
        cleanup,
    )
}

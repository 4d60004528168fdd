use sirang::common::RETRIEVE_ONLY_ID;
use sirang::doc;
use sirang::filter::all;
use sirang::{CaptureOptions, LoggerMode, SirangError, StoreOptions, Verbosity};
use sirang_int_test::test_util::{cleanup, create_sibling_logger, create_test_context, run_test};

#[test]
fn test_retrieve_only_skips_writes() {
    run_test(
        create_test_context,
        |ctx| {
            let writer = ctx.logger();
            writer.store(ctx.db_name(), "c", doc! { "_id": 1, x: 1 }, StoreOptions::new())?;

            let reader = create_sibling_logger(&ctx, |builder| builder.mode(LoggerMode::RetrieveOnly))?;
            assert_eq!(reader.mode(), LoggerMode::RetrieveOnly);

            let id = reader.store(ctx.db_name(), "c", doc! { x: 2 }, StoreOptions::new())?;
            assert_eq!(id, RETRIEVE_ONLY_ID);
            let id = reader.store_meta(ctx.db_name(), "meta", None, None)?;
            assert_eq!(id, RETRIEVE_ONLY_ID);

            assert_eq!(reader.collection_doc_count(ctx.db_name(), "c")?, 1);
            assert_eq!(reader.collection_doc_count(ctx.db_name(), "meta")?, 0);
            assert_eq!(reader.retrieve(ctx.db_name(), "c", all())?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_retrieve_only_still_runs_captured_function() {
    run_test(
        create_test_context,
        |ctx| {
            let reader = create_sibling_logger(&ctx, |builder| builder.mode(LoggerMode::RetrieveOnly))?;
            let decorator = reader.dstore(
                ctx.db_name(),
                "runs",
                CaptureOptions::new().id_template("run-{}"),
            )?;

            let mut calls = 0;
            {
                let mut train = decorator.wrap(|params| {
                    calls += 1;
                    Ok::<_, SirangError>(params.get("epochs").as_i64().unwrap_or_default() * 2)
                })?;
                assert_eq!(train.call(doc! { epochs: 4 })?, 8);
            }
            assert_eq!(calls, 1);
            assert_eq!(reader.collection_doc_count(ctx.db_name(), "runs")?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_verbose_logger_writes_and_reads() {
    run_test(
        create_test_context,
        |ctx| {
            let verbose = create_sibling_logger(&ctx, |builder| builder.verbose(1))?;
            assert_eq!(verbose.config().verbosity(), Verbosity::Info);

            let id = verbose.store(ctx.db_name(), "c", doc! { "_id": "v", x: 1 }, StoreOptions::new())?;
            assert_eq!(id, "v");
            let found = ctx.logger().retrieve(ctx.db_name(), "c", doc! { x: 1 })?;
            assert_eq!(found.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

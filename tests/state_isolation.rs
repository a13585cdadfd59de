//! Nothing from one attempt is visible to the next. Kept in its own test
//! binary so no other test touches the plot context concurrently.

use codehub_runner::figure::figure_count;
use codehub_runner::{ExecutionOutcome, ExecutionRequest, Executor};
use pretty_assertions::assert_eq;

#[test]
fn test_no_state_survives_any_outcome() {
    let executor = Executor::default();
    let baseline = executor.execute(&ExecutionRequest::fresh(r#"print(figure_count());"#));
    assert_eq!(baseline.output(), "0\n");

    let runs = [
        ("completed", r#"let kept = 1; plot([1, 2, 3]); print("done");"#),
        ("paused", r#"let kept = 2; scatter([1, 2], [3, 4]); input("more? ");"#),
        ("failed", r#"let kept = 3; bar([5, 6]); throw "stop";"#),
    ];

    for (label, script) in runs {
        let outcome = executor.execute(&ExecutionRequest::fresh(script));
        assert_eq!(outcome.label(), label);
        assert_eq!(figure_count(), 0, "figures left after a {label} attempt");

        // a later unrelated attempt behaves like a fresh process
        assert_eq!(executor.execute(&ExecutionRequest::fresh(r#"print(figure_count());"#)), baseline);
        match executor.execute(&ExecutionRequest::fresh("print(kept);")) {
            ExecutionOutcome::Failed { error_kind, .. } => assert_eq!(error_kind, "NameError"),
            other => panic!("script variable survived a {label} attempt: {other:?}"),
        }
    }
}

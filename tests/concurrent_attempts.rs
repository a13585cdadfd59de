//! Attempts started from several threads at once stay independent: each
//! sees only its own output, answers and figures.

use std::thread;

use codehub_runner::figure::figure_count;
use codehub_runner::{ExecutionOutcome, ExecutionRequest, Executor};
use pretty_assertions::assert_eq;

const THREADS: usize = 8;
const ROUNDS: usize = 20;

fn script_for(worker: usize) -> String {
    format!(r#"print({worker}); plot([{worker}, 2]); let a = input("a? "); print(a);"#)
}

#[test]
fn test_parallel_attempts_do_not_interfere() {
    let executor = Executor::default();

    thread::scope(|scope| {
        for worker in 0..THREADS {
            let executor = &executor;
            scope.spawn(move || {
                let script = script_for(worker);
                for round in 0..ROUNDS {
                    let paused = executor.execute(&ExecutionRequest::fresh(script.clone()));
                    assert_eq!(
                        paused,
                        ExecutionOutcome::Paused {
                            prompt: "a? ".to_string(),
                            output: format!("{worker}\n"),
                            next_cursor: 0,
                        },
                        "worker {worker} round {round}"
                    );

                    let answer = format!("a{worker}");
                    let request = ExecutionRequest::replaying(script.clone(), vec![answer.clone()]);
                    match executor.execute(&request) {
                        ExecutionOutcome::Completed { output, image } => {
                            assert_eq!(output, format!("{worker}\n{answer}\n"));
                            assert!(image.is_some(), "worker {worker} round {round} lost its figure");
                        }
                        other => panic!("worker {worker} round {round}: {other:?}"),
                    }
                }
            });
        }
    });

    assert_eq!(figure_count(), 0);
}

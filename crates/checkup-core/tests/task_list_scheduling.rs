use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use checkup_core::models::{CoreError, CoreErrorKind, RunArgs, TaskDescriptor};
use checkup_core::result::{JsonRecord, TaskResult, keyed_record, merge_task_results};
use checkup_core::task::{Task, TaskConstructor, TaskFuture};
use checkup_core::{ExecutionPolicy, TaskList};
use serde_json::{Value, json};

#[derive(Debug)]
struct PathResult {
    name: &'static str,
    path: String,
}

impl TaskResult for PathResult {
    fn to_json(&self) -> JsonRecord {
        keyed_record(self.name, Value::String(self.path.clone()))
    }

    fn to_console(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}: {}", self.name, self.path)
    }
}

enum Behavior {
    Succeed,
    Fail,
    Panic,
}

struct DelayedTask {
    name: &'static str,
    delay: Duration,
    behavior: Behavior,
    args: Arc<RunArgs>,
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

impl Task for DelayedTask {
    fn run(self: Box<Self>) -> TaskFuture {
        Box::pin(async move {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);

            match self.behavior {
                Behavior::Succeed => Ok(Box::new(PathResult {
                    name: self.name,
                    path: self.args.path().display().to_string(),
                }) as Box<dyn TaskResult>),
                Behavior::Fail => Err(CoreError::new(
                    CoreErrorKind::TaskFailure,
                    format!("{} could not finish", self.name),
                )),
                Behavior::Panic => panic!("{} blew up", self.name),
            }
        })
    }
}

#[derive(Clone, Default)]
struct Tracker {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
    constructed: Arc<AtomicUsize>,
}

impl Tracker {
    fn task(&self, name: &'static str, delay_ms: u64, behavior: fn() -> Behavior) -> TaskConstructor {
        let tracker = self.clone();
        TaskConstructor::new(TaskDescriptor::new(name, name), move |args| {
            tracker.constructed.fetch_add(1, Ordering::SeqCst);
            DelayedTask {
                name,
                delay: Duration::from_millis(delay_ms),
                behavior: behavior(),
                args,
                current: tracker.current.clone(),
                peak: tracker.peak.clone(),
                finished: tracker.finished.clone(),
            }
        })
    }
}

fn succeed() -> Behavior {
    Behavior::Succeed
}

fn fail() -> Behavior {
    Behavior::Fail
}

fn explode() -> Behavior {
    Behavior::Panic
}

fn args() -> Arc<RunArgs> {
    Arc::new(RunArgs::new("/work/app"))
}

fn keys(results: &[Box<dyn TaskResult>]) -> Vec<String> {
    results
        .iter()
        .flat_map(|result| result.to_json().keys().cloned().collect::<Vec<_>>())
        .collect()
}

#[tokio::test]
async fn results_follow_insertion_order_not_completion_order() {
    let tracker = Tracker::default();
    let mut list = TaskList::new();
    list.add_task(tracker.task("slow", 120, succeed), args());
    list.add_tasks(
        [
            tracker.task("fast", 5, succeed),
            tracker.task("medium", 60, succeed),
            tracker.task("instant", 0, succeed),
        ],
        args(),
    );
    assert_eq!(list.names(), vec!["slow", "fast", "medium", "instant"]);

    let results = list.run_tasks().await.unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(keys(&results), vec!["slow", "fast", "medium", "instant"]);
    assert_eq!(
        Value::Object(results[0].to_json()),
        json!({ "slow": "/work/app" })
    );
}

#[tokio::test]
async fn tasks_run_concurrently() {
    let tracker = Tracker::default();
    let mut list = TaskList::new();
    list.add_tasks(
        [
            tracker.task("one", 80, succeed),
            tracker.task("two", 80, succeed),
            tracker.task("three", 80, succeed),
        ],
        args(),
    );

    list.run_tasks().await.unwrap();

    assert_eq!(tracker.peak.load(Ordering::SeqCst), 3);
    assert_eq!(tracker.constructed.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn empty_list_yields_no_results() {
    let results = TaskList::new().run_tasks().await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn fail_soft_keeps_other_results_and_marks_the_failure_in_place() {
    let tracker = Tracker::default();
    let mut list = TaskList::with_policy(ExecutionPolicy::FailSoft);
    list.add_tasks(
        [
            tracker.task("first", 30, succeed),
            tracker.task("broken", 0, fail),
            tracker.task("third", 10, succeed),
        ],
        args(),
    );

    let results = list.run_tasks().await.unwrap();

    assert_eq!(keys(&results), vec!["first", "broken", "third"]);
    assert!(!results[0].is_error());
    assert!(results[1].is_error());
    assert_eq!(
        Value::Object(results[1].to_json()),
        json!({ "broken": { "error": "broken could not finish" } })
    );
    assert_eq!(tracker.finished.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn fail_soft_turns_a_panic_into_an_error_result() {
    let tracker = Tracker::default();
    let mut list = TaskList::new();
    list.add_tasks(
        [tracker.task("panicky", 0, explode), tracker.task("fine", 0, succeed)],
        args(),
    );

    let results = list.run_tasks().await.unwrap();

    assert!(results[0].is_error());
    assert_eq!(
        Value::Object(results[0].to_json()),
        json!({ "panicky": { "error": "task 'panicky' panicked" } })
    );
    assert!(!results[1].is_error());
}

#[tokio::test]
async fn fail_fast_returns_the_first_failure() {
    let tracker = Tracker::default();
    let mut list = TaskList::with_policy(ExecutionPolicy::FailFast);
    list.add_tasks(
        [
            tracker.task("slow", 500, succeed),
            tracker.task("broken", 0, fail),
        ],
        args(),
    );

    let error = list.run_tasks().await.err().unwrap();

    assert_eq!(error.kind, CoreErrorKind::TaskFailure);
    assert_eq!(error.task.as_deref(), Some("broken"));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(
        tracker.finished.load(Ordering::SeqCst),
        1,
        "remaining tasks are aborted"
    );
}

#[tokio::test]
async fn merged_report_combines_records_from_every_task() {
    let tracker = Tracker::default();
    let mut list = TaskList::new();
    list.add_tasks(
        [tracker.task("a", 20, succeed), tracker.task("b", 0, succeed)],
        args(),
    );

    let results = list.run_tasks().await.unwrap();

    assert_eq!(
        Value::Object(merge_task_results(&results)),
        json!({ "a": "/work/app", "b": "/work/app" })
    );
}

use std::sync::atomic::{AtomicUsize, Ordering};

use paratask::errors::ParataskError;
use paratask::{Scheduler, TaskId, TaskState};
use paratask_test_utils::init_tracing;

fn noop(_: TaskId, _: usize, _: usize) {}

#[test]
fn zero_workers_is_rejected() {
    match Scheduler::new(0) {
        Err(ParataskError::InvalidWorkerCount) => {}
        Err(e) => panic!("Expected InvalidWorkerCount, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_dependency_is_rejected_without_consuming_an_id() {
    let mut scheduler = Scheduler::new(1).unwrap();
    let a = scheduler.submit(&noop, 1);
    let bogus = TaskId::new(42).unwrap();

    match scheduler.submit_with_dependencies(&noop, 1, &[a, bogus]) {
        Err(ParataskError::UnknownDependency(id)) => assert_eq!(id, bogus),
        other => panic!("Expected UnknownDependency, got: {:?}", other),
    }

    // Forward references are unknown too.
    match scheduler.submit_with_dependencies(&noop, 1, &[TaskId::new(2).unwrap()]) {
        Err(ParataskError::UnknownDependency(_)) => {}
        other => panic!("Expected UnknownDependency, got: {:?}", other),
    }

    let b = scheduler.submit(&noop, 1);
    assert_eq!(b.get(), 2);
    assert_eq!(scheduler.run_to_completion().unwrap().tasks_released(), 2);
}

#[test]
fn duplicate_dependency_is_rejected() {
    let mut scheduler = Scheduler::new(1).unwrap();
    let a = scheduler.submit(&noop, 1);
    let b = scheduler.submit(&noop, 1);

    match scheduler.submit_with_dependencies(&noop, 1, &[a, b, a]) {
        Err(ParataskError::DuplicateDependency(id)) => assert_eq!(id, a),
        other => panic!("Expected DuplicateDependency, got: {:?}", other),
    }
    assert_eq!(scheduler.pending_tasks(), 2);
}

#[test]
fn dependency_on_released_task_is_rejected() {
    let mut scheduler = Scheduler::new(2).unwrap();
    let a = scheduler.submit(&noop, 2);
    scheduler.run_to_completion().unwrap();
    assert_eq!(scheduler.state_of(a), Some(TaskState::Released));

    let err = scheduler
        .submit_with_dependencies(&noop, 1, &[a])
        .expect_err("released dependency must be rejected");
    assert!(matches!(err, ParataskError::ReleasedDependency(id) if id == a));
    assert!(err.to_string().contains("already released"));
}

#[test]
fn job_panic_is_reported_and_stops_later_waves() {
    init_tracing();

    let ran_after = AtomicUsize::new(0);
    let exploding = |_: TaskId, job: usize, _: usize| {
        if job == 1 {
            panic!("job one exploded");
        }
    };
    let follower = |_: TaskId, _: usize, _: usize| {
        ran_after.fetch_add(1, Ordering::SeqCst);
    };

    let mut scheduler = Scheduler::new(2).unwrap();
    let a = scheduler.submit(&exploding, 3);
    let b = scheduler.submit_with_dependencies(&follower, 2, &[a]).unwrap();

    match scheduler.run_to_completion() {
        Err(ParataskError::JobPanicked {
            task_id,
            job_index,
            message,
        }) => {
            assert_eq!(task_id, a);
            assert_eq!(job_index, 1);
            assert!(message.contains("exploded"));
        }
        other => panic!("Expected JobPanicked, got: {:?}", other),
    }

    assert_eq!(ran_after.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.state_of(b), Some(TaskState::Ready));

    // Workers survived the panic; the remaining wave can still be drained.
    let summary = scheduler.run_to_completion().unwrap();
    assert_eq!(summary.waves.len(), 1);
    assert_eq!(summary.waves[0].tasks, vec![b]);
    assert_eq!(ran_after.load(Ordering::SeqCst), 2);
}

#[test]
fn dropping_without_running_does_not_hang() {
    let mut scheduler = Scheduler::new(3).unwrap();
    let a = scheduler.submit(&noop, 10);
    scheduler.submit_with_dependencies(&noop, 1, &[a]).unwrap();
    assert_eq!(scheduler.pending_tasks(), 2);
    drop(scheduler);
}

#[test]
fn error_messages_name_the_task() {
    let err = ParataskError::JobPanicked {
        task_id: TaskId::new(7).unwrap(),
        job_index: 3,
        message: "boom".to_string(),
    };
    assert_eq!(err.to_string(), "job 3 of task #7 panicked: boom");

    let err = ParataskError::Unsatisfiable {
        pending: vec![TaskId::new(2).unwrap(), TaskId::new(5).unwrap()],
    };
    assert!(err.to_string().starts_with("2 task(s) never became ready"));
}

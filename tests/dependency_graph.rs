use paratask::dag::DependencyGraph;
use paratask::TaskId;

fn tid(raw: u64) -> TaskId {
    TaskId::new(raw).unwrap()
}

#[test]
fn task_without_dependencies_is_ready_immediately() {
    let mut graph = DependencyGraph::new();
    assert!(graph.add_task(tid(1), &[]));
    assert!(!graph.add_task(tid(2), &[tid(1)]));

    assert_eq!(graph.ready().collect::<Vec<_>>(), vec![tid(1)]);
    assert_eq!(graph.in_degree(tid(2)), 1);
    assert_eq!(graph.successors_of(tid(1)), &[tid(2)]);
    assert_eq!(graph.waiting(), vec![tid(2)]);
}

#[test]
fn release_frees_successors_when_last_prerequisite_goes() {
    let mut graph = DependencyGraph::new();
    graph.add_task(tid(1), &[]);
    graph.add_task(tid(2), &[]);
    graph.add_task(tid(3), &[tid(1), tid(2)]);
    graph.add_task(tid(4), &[tid(1)]);

    assert_eq!(graph.take_ready(), vec![tid(1), tid(2)]);
    assert_eq!(graph.ready().count(), 0);

    assert_eq!(graph.release(tid(1)), vec![tid(4)]);
    assert_eq!(graph.in_degree(tid(3)), 1);
    assert!(graph.successors_of(tid(1)).is_empty());

    assert_eq!(graph.release(tid(2)), vec![tid(3)]);
    assert_eq!(graph.in_degree(tid(3)), 0);
    assert!(graph.waiting().is_empty());
}

#[test]
fn releasing_a_task_twice_frees_nothing_more() {
    let mut graph = DependencyGraph::new();
    graph.add_task(tid(1), &[]);
    graph.add_task(tid(2), &[tid(1)]);

    assert_eq!(graph.release(tid(1)), vec![tid(2)]);
    assert!(graph.release(tid(1)).is_empty());
}

#[test]
fn restore_ready_puts_tasks_back_in_front() {
    let mut graph = DependencyGraph::new();
    graph.add_task(tid(1), &[]);
    graph.add_task(tid(2), &[]);
    let taken = graph.take_ready();

    graph.add_task(tid(3), &[]);
    graph.restore_ready(taken);
    assert_eq!(graph.take_ready(), vec![tid(1), tid(2), tid(3)]);
}

#[test]
fn plan_is_level_synchronous_and_side_effect_free() {
    // 1 -> 2 -> 4, 3 -> 4, 5 isolated
    let mut graph = DependencyGraph::new();
    graph.add_task(tid(1), &[]);
    graph.add_task(tid(2), &[tid(1)]);
    graph.add_task(tid(3), &[]);
    graph.add_task(tid(4), &[tid(2), tid(3)]);
    graph.add_task(tid(5), &[]);

    let plan = graph.plan();
    assert_eq!(
        plan,
        vec![vec![tid(1), tid(3), tid(5)], vec![tid(2)], vec![tid(4)]]
    );

    assert_eq!(graph.ready().count(), 3);
    assert_eq!(graph.waiting(), vec![tid(2), tid(4)]);
}

#[test]
fn cycle_leaves_tasks_waiting() {
    // Not constructible through the scheduler; the graph itself just never
    // frees these tasks.
    let mut graph = DependencyGraph::new();
    graph.add_task(tid(1), &[tid(2)]);
    graph.add_task(tid(2), &[tid(1)]);

    assert!(graph.plan().is_empty());
    assert_eq!(graph.waiting(), vec![tid(1), tid(2)]);
}

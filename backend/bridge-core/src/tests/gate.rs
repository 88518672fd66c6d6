use crate::gate::CallGate;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

fn wait_for_ticket(gate: &CallGate<u64>, ticket: u64) {
    while gate.current_ticket() < ticket {
        thread::yield_now();
    }
}

/// **VALUE**: Of three calls queued behind a running one, only the newest runs.
///
/// **WHY THIS MATTERS**: Dragging a quality slider fires a call per tick. Only the
/// last setting matters; encoding every intermediate one would pile up minutes
/// of work.
///
/// **BUG THIS CATCHES**: Would catch comparing tickets before taking the execution
/// lock, or running superseded bodies anyway.
#[test]
fn given_three_calls_admitted_while_locked_when_released_then_only_newest_body_runs() {
    // GIVEN: The execution lock is held while three calls take tickets 1, 2, 3
    let gate = Arc::new(CallGate::new("compress", 0u64));
    let runs = Arc::new(AtomicUsize::new(0));
    let held = gate.lock_execution();

    let mut callers = Vec::new();
    for ticket in 1..=3u64 {
        let caller_gate = Arc::clone(&gate);
        let runs = Arc::clone(&runs);
        callers.push(thread::spawn(move || {
            caller_gate.run(|| {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(ticket * 100)
            })
        }));
        wait_for_ticket(&gate, ticket);
    }

    // WHEN: The lock is released
    drop(held);
    let results: Vec<u64> = callers
        .into_iter()
        .map(|caller| caller.join().unwrap().unwrap())
        .collect();

    // THEN: One body ran, for ticket 3; the others got the default
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(results, vec![0, 0, 300]);
}

/// **VALUE**: A running body is never preempted, and a call admitted while it
/// runs still executes afterwards.
///
/// **WHY THIS MATTERS**: The supersession check happens once, at lock acquisition.
/// A call that finds itself current must run even though it waited.
///
/// **BUG THIS CATCHES**: Would catch a gate that re-checks tickets after the body
/// or discards the newest waiting call.
#[test]
fn given_call_admitted_during_running_body_when_body_finishes_then_both_complete() {
    // GIVEN: Call A is inside its body, blocked on a channel
    let gate = Arc::new(CallGate::new("metrics", 0u64));
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let first = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || {
            gate.run(|| {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                Ok::<_, ()>(1)
            })
        })
    };
    started_rx.recv().unwrap();

    // WHEN: Call B is admitted while A runs, then A is released
    let second = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || gate.run(|| Ok::<_, ()>(2)))
    };
    wait_for_ticket(&gate, 2);
    release_tx.send(()).unwrap();

    // THEN: A finished with its own value and B ran after it
    assert_eq!(first.join().unwrap(), Ok(1));
    assert_eq!(second.join().unwrap(), Ok(2));
}

#[test]
fn given_sequential_calls_when_run_then_every_body_executes() {
    // GIVEN: No contention
    let gate = CallGate::new("read", String::new());

    // WHEN/THEN: Each call is current when it reaches the lock
    for n in 0..5 {
        assert_eq!(gate.run(|| Ok::<_, ()>(format!("call {n}"))), Ok(format!("call {n}")));
    }
    assert_eq!(gate.current_ticket(), 5);
}

#[test]
fn given_body_error_when_run_then_error_is_returned_unchanged() {
    let gate = CallGate::new("encode", 0u64);

    let result: Result<u64, String> = gate.run(|| Err("encoder exploded".to_string()));

    assert_eq!(result, Err("encoder exploded".to_string()));
}

/// **VALUE**: A panicking body does not wedge the gate.
///
/// **BUG THIS CATCHES**: Would catch `lock().unwrap()` on a poisoned execution
/// lock, which would fail every later call for the process lifetime.
#[test]
fn given_previous_body_panicked_when_next_call_runs_then_it_succeeds() {
    // GIVEN: A call whose body panics
    let gate = Arc::new(CallGate::new("panicky", 0u64));
    let crashing = Arc::clone(&gate);
    let crashed = thread::spawn(move || crashing.run(|| -> Result<u64, ()> { panic!("boom") })).join();
    assert!(crashed.is_err());

    // WHEN: Another call arrives
    let result = gate.run(|| Ok::<_, ()>(7));

    // THEN: It runs normally
    assert_eq!(result, Ok(7));
}

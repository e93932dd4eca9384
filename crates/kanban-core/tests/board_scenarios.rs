//! End-to-end board scenarios against both backends

use kanban_core::{
    BoardEvent, BoardStore, ColumnDef, DropTarget, Error, LocalStorage, MemoryStorage, Storage,
    Task,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tempfile::TempDir;

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("todo", "To Do"),
        ColumnDef::new("doing", "Doing"),
        ColumnDef::new("done", "Done"),
    ]
}

fn open<S: Storage>(storage: S) -> (BoardStore<S>, Rc<RefCell<Vec<BoardEvent>>>) {
    let mut store = BoardStore::new(storage);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    store.subscribe(move |event| {
        sink.borrow_mut().push(event.clone());
        Ok(())
    });
    store.init(&columns()).unwrap();
    (store, events)
}

/// Every task id on the board must appear in exactly one column
fn assert_single_membership<S: Storage>(store: &BoardStore<S>) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for column in store.columns() {
        for task in &column.tasks {
            if let Some(other) = seen.insert(&task.id, &column.id) {
                panic!("task {} in both {} and {}", task.id, other, column.id);
            }
        }
    }
}

fn run_add_move_remove<S: Storage>(storage: S) {
    let (mut store, _events) = open(storage);
    let task = Task::new("1", "write docs");

    store.add_task("todo", task.clone()).unwrap();
    assert_eq!(store.get_tasks("todo"), &[task.clone()]);

    store.move_task("todo", "doing", &task, Some(0)).unwrap();
    assert!(store.get_tasks("todo").is_empty());
    assert_eq!(store.get_tasks("doing"), &[task.clone()]);

    assert!(store.remove_task("doing", &task).unwrap());
    assert!(store.get_tasks("doing").is_empty());
}

#[test]
fn test_add_move_remove_in_memory() {
    run_add_move_remove(MemoryStorage::new());
}

#[test]
fn test_add_move_remove_persisted() {
    let temp = TempDir::new().unwrap();
    run_add_move_remove(LocalStorage::new(temp.path()));
}

#[test]
fn test_add_to_missing_column_changes_nothing() {
    let (mut store, events) = open(MemoryStorage::new());
    store.add_task("todo", Task::new("1", "a")).unwrap();
    let before: Vec<Vec<Task>> = columns()
        .iter()
        .map(|c| store.get_tasks(&c.id).to_vec())
        .collect();
    let event_count = events.borrow().len();

    let result = store.add_task("missing-column", Task::new("2", ""));
    assert!(matches!(result, Err(Error::ColumnNotFound(_))));

    let after: Vec<Vec<Task>> = columns()
        .iter()
        .map(|c| store.get_tasks(&c.id).to_vec())
        .collect();
    assert_eq!(before, after);
    assert_eq!(events.borrow().len(), event_count);
}

#[test]
fn test_every_mutation_emits_one_event() {
    let (mut store, events) = open(MemoryStorage::new());
    assert_eq!(events.borrow().len(), 1);

    store.add_task("todo", Task::new("1", "a")).unwrap();
    store.add_task("todo", Task::new("2", "b")).unwrap();
    store.move_task("todo", "done", &Task::new("1", "a"), Some(0)).unwrap();
    store.update_task_description("2", "b2").unwrap();
    store.remove_task("todo", &Task::new("2", "b2")).unwrap();
    store.delete_task("1").unwrap();

    let kinds: Vec<String> = events.borrow().iter().map(|e| e.kind().to_string()).collect();
    assert_eq!(
        kinds,
        vec![
            "init",
            "addTask",
            "addTask",
            "moveTask",
            "updateTaskDescription",
            "removeTask",
            "removeTask"
        ]
    );
}

#[test]
fn test_events_replay_to_the_same_board() {
    let (mut store, events) = open(MemoryStorage::new());

    store.add_task("todo", Task::new("1", "a")).unwrap();
    store.add_task("todo", Task::new("2", "b")).unwrap();
    store.add_task("doing", Task::new("3", "c")).unwrap();
    store.move_task("todo", "doing", &Task::new("2", "b"), Some(0)).unwrap();
    store.move_task("doing", "doing", &Task::new("2", "b"), None).unwrap();
    store.update_task_description("3", "c2").unwrap();
    store.apply_drop("1", &DropTarget::new("done", 0)).unwrap();
    store.delete_task("3").unwrap();

    // A view that only ever sees events must end up where the store is.
    let mut view: HashMap<String, Vec<Task>> = HashMap::new();
    for event in events.borrow().iter() {
        match event {
            BoardEvent::Init { columns } => {
                for c in columns {
                    view.insert(c.id.clone(), c.tasks.clone());
                }
            }
            BoardEvent::AddTask {
                column_id,
                task,
                index,
            } => view.get_mut(column_id).unwrap().insert(*index, task.clone()),
            BoardEvent::RemoveTask {
                column_id, index, ..
            } => {
                view.get_mut(column_id).unwrap().remove(*index);
            }
            BoardEvent::MoveTask {
                source_column_id,
                target_column_id,
                task,
                target_index,
            } => {
                view.get_mut(source_column_id)
                    .unwrap()
                    .retain(|t| t.id != task.id);
                view.get_mut(target_column_id)
                    .unwrap()
                    .insert(*target_index, task.clone());
            }
            BoardEvent::UpdateTaskDescription {
                column_id,
                description,
                index,
                ..
            } => {
                view.get_mut(column_id).unwrap()[*index].description = description.clone();
            }
        }
    }

    for column in store.columns() {
        assert_eq!(&view[&column.id], &column.tasks, "column {}", column.id);
    }
}

#[test]
fn test_moves_never_duplicate_or_lose_tasks() {
    let (mut store, _events) = open(MemoryStorage::new());
    for i in 0..6 {
        let column = ["todo", "doing", "done"][i % 3];
        store.add_task(column, Task::new(i.to_string(), "x")).unwrap();
    }

    let moves = [
        ("0", "done", 0),
        ("1", "todo", 5),
        ("2", "doing", 1),
        ("0", "done", 9),
        ("3", "todo", 0),
        ("5", "done", 2),
        ("4", "doing", 0),
    ];
    for (id, target, index) in moves {
        let (column, task) = store.find_task(id).unwrap();
        let source = column.id.clone();
        let task = task.clone();

        let landed = store.move_task(&source, target, &task, Some(index)).unwrap();
        assert_eq!(store.get_tasks(target)[landed].id, id);
        assert_single_membership(&store);
        assert_eq!(store.board().task_count(), 6);
    }
}

#[test]
fn test_move_lands_at_min_of_index_and_length() {
    let (mut store, _events) = open(MemoryStorage::new());
    store.add_task("doing", Task::new("a", "x")).unwrap();
    store.add_task("doing", Task::new("b", "x")).unwrap();
    store.add_task("todo", Task::new("t", "moving")).unwrap();

    let len = store.get_tasks("doing").len();
    store.move_task("todo", "doing", &Task::new("t", "moving"), Some(7)).unwrap();
    assert_eq!(store.get_tasks("doing")[len.min(7)].id, "t");
}

#[test]
fn test_rereads_are_stable() {
    let (mut store, _events) = open(MemoryStorage::new());
    store.add_task("todo", Task::new("1", "a")).unwrap();
    let first = store.get_tasks("todo").to_vec();
    let second = store.get_tasks("todo").to_vec();
    assert_eq!(first, second);
    assert!(store.get_tasks("no-such-column").is_empty());
}

#[test]
fn test_persisted_board_survives_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let (mut store, _events) = open(LocalStorage::new(temp.path()));
        store.add_task("todo", Task::new("1", "a")).unwrap();
        store.add_task("todo", Task::new("2", "b")).unwrap();
        store.move_task("todo", "done", &Task::new("2", "b"), None).unwrap();
        store.update_task_description("1", "a2").unwrap();
    }

    let (store, events) = open(LocalStorage::new(temp.path()));
    assert_eq!(store.get_tasks("todo"), &[Task::new("1", "a2")]);
    assert_eq!(store.get_tasks("done"), &[Task::new("2", "b")]);
    match &events.borrow()[0] {
        BoardEvent::Init { columns } => assert_eq!(columns[2].tasks.len(), 1),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_move_with_stale_copy_persists_current_record() {
    let temp = TempDir::new().unwrap();
    {
        let (mut store, _events) = open(LocalStorage::new(temp.path()));
        store.add_task("todo", Task::new("1", "current")).unwrap();
        store
            .move_task("todo", "done", &Task::new("1", "stale"), None)
            .unwrap();
        assert_eq!(store.get_tasks("done"), &[Task::new("1", "current")]);
        assert_eq!(store.storage().get_tasks("done"), store.get_tasks("done"));
    }

    let (store, _events) = open(LocalStorage::new(temp.path()));
    assert_eq!(store.get_tasks("done"), &[Task::new("1", "current")]);
}

#[test]
fn test_failed_write_is_not_persisted_later() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("board");
    {
        let (mut store, events) = open(LocalStorage::new(&dir));
        let event_count = events.borrow().len();

        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::write(&dir, "").unwrap();
        let result = store.add_task("todo", Task::new("ghost", "failed add"));
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(events.borrow().len(), event_count);

        std::fs::remove_file(&dir).unwrap();
        store.add_task("done", Task::new("2", "kept")).unwrap();
        // The id was never committed, so it is still free.
        store.add_task("todo", Task::new("ghost", "retry")).unwrap();
    }

    let (store, _events) = open(LocalStorage::new(&dir));
    assert_eq!(store.get_tasks("todo"), &[Task::new("ghost", "retry")]);
    assert_eq!(store.get_tasks("done"), &[Task::new("2", "kept")]);
}


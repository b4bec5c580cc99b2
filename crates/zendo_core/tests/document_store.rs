use zendo_core::{
    create_document, Command, CommandOutcome, DocumentStore, MemoryKvStore, StoreError,
    DEFAULT_TASK_COLOR, MAX_TABS,
};
use uuid::Uuid;

fn fresh_store() -> DocumentStore<MemoryKvStore> {
    DocumentStore::with_document(MemoryKvStore::new(), create_document())
}

fn task_texts(store: &DocumentStore<MemoryKvStore>) -> Vec<String> {
    store
        .active_tab()
        .unwrap()
        .tasks
        .iter()
        .map(|task| task.text.clone())
        .collect()
}

fn assert_invariants(store: &DocumentStore<MemoryKvStore>) {
    let doc = store.document();
    assert!((1..=MAX_TABS).contains(&doc.tabs.len()));
    assert!(store.active_tab().is_some());
}

#[test]
fn add_tab_stops_at_capacity() {
    let mut store = fresh_store();

    for expected in 2..=MAX_TABS {
        let tab_id = store.add_tab().unwrap();
        assert_eq!(store.document().active_tab_id, tab_id);
        assert_eq!(store.active_tab().unwrap().name, format!("Tab {expected}"));
    }

    let before = store.document().clone();
    let err = store.add_tab().unwrap_err();
    assert!(matches!(err, StoreError::CapacityExceeded { max: 5 }));
    assert_eq!(store.document(), &before);
    assert_eq!(store.document().tabs.len(), 5);
}

#[test]
fn removing_active_tab_activates_first_and_protects_last() {
    let mut store = fresh_store();
    let second = store.add_tab().unwrap();

    assert!(store.remove_tab(second).unwrap());
    assert_eq!(store.document().tabs.len(), 1);
    assert_eq!(store.document().active_tab_id, store.document().tabs[0].id);

    let remaining = store.document().tabs[0].id;
    let err = store.remove_tab(remaining).unwrap_err();
    assert!(matches!(err, StoreError::LastTabProtected));
    assert_eq!(store.document().tabs[0].id, remaining);
}

#[test]
fn removing_inactive_tab_keeps_active_pointer() {
    let mut store = fresh_store();
    let first = store.document().tabs[0].id;
    let second = store.add_tab().unwrap();
    store.set_active_tab(first).unwrap();

    assert!(store.remove_tab(second).unwrap());
    assert_eq!(store.document().active_tab_id, first);
}

#[test]
fn removing_unknown_tab_is_noop() {
    let mut store = fresh_store();
    store.add_tab().unwrap();
    let writes = store.storage().write_count();

    assert!(!store.remove_tab(Uuid::new_v4()).unwrap());
    assert_eq!(store.document().tabs.len(), 2);
    assert_eq!(store.storage().write_count(), writes);
}

#[test]
fn tab_names_are_never_renumbered() {
    let mut store = fresh_store();
    let second = store.add_tab().unwrap();
    store.add_tab().unwrap();
    store.remove_tab(second).unwrap();

    let names: Vec<&str> = store
        .document()
        .tabs
        .iter()
        .map(|tab| tab.name.as_str())
        .collect();
    assert_eq!(names, ["Tab 1", "Tab 3"]);

    store.add_tab().unwrap();
    assert_eq!(store.active_tab().unwrap().name, "Tab 3");
}

#[test]
fn rename_tab_trims_and_keeps_name_when_blank() {
    let mut store = fresh_store();
    let tab_id = store.document().tabs[0].id;

    assert!(store.rename_tab(tab_id, "  Groceries ").unwrap());
    assert_eq!(store.active_tab().unwrap().name, "Groceries");

    assert!(!store.rename_tab(tab_id, "   ").unwrap());
    assert_eq!(store.active_tab().unwrap().name, "Groceries");
}

#[test]
fn add_task_trims_prepends_and_rejects_blank() {
    let mut store = fresh_store();

    store.add_task("  Buy milk  ").unwrap().unwrap();
    store.add_task("Walk dog").unwrap().unwrap();
    assert_eq!(task_texts(&store), ["Walk dog", "Buy milk"]);

    assert_eq!(store.add_task("   ").unwrap(), None);
    assert_eq!(store.active_tab().unwrap().tasks.len(), 2);

    let task = &store.active_tab().unwrap().tasks[1];
    assert!(!task.done);
    assert_eq!(task.color, DEFAULT_TASK_COLOR);
}

#[test]
fn duplicate_task_text_is_allowed() {
    let mut store = fresh_store();
    let a = store.add_task("same").unwrap().unwrap();
    let b = store.add_task("same").unwrap().unwrap();
    assert_ne!(a, b);
    assert_eq!(task_texts(&store), ["same", "same"]);
}

#[test]
fn set_task_done_is_idempotent() {
    let mut store = fresh_store();
    let task_id = store.add_task("file taxes").unwrap().unwrap();

    store.set_task_done(task_id, true).unwrap();
    let once = store.document().clone();
    store.set_task_done(task_id, true).unwrap();
    assert_eq!(store.document(), &once);
}

#[test]
fn task_field_updates_are_scoped_to_active_tab() {
    let mut store = fresh_store();
    let task_id = store.add_task("draft").unwrap().unwrap();

    assert!(store.update_task_text(task_id, " raw text ").unwrap());
    assert!(store.set_task_color(task_id, "not-a-color").unwrap());
    let task = &store.active_tab().unwrap().tasks[0];
    assert_eq!(task.text, " raw text ");
    assert_eq!(task.color, "not-a-color");

    store.add_tab().unwrap();
    assert!(!store.set_task_done(task_id, true).unwrap());
    assert!(!store.delete_task(task_id).unwrap());
}

#[test]
fn delete_task_removes_subtree() {
    let mut store = fresh_store();
    let keep = store.add_task("keep").unwrap().unwrap();
    let drop = store.add_task("drop").unwrap().unwrap();
    store.add_subtask(drop, "child").unwrap().unwrap();

    assert!(store.delete_task(drop).unwrap());
    let tab = store.active_tab().unwrap();
    assert_eq!(tab.tasks.len(), 1);
    assert_eq!(tab.tasks[0].id, keep);
    assert!(!store.delete_task(drop).unwrap());
}

#[test]
fn subtasks_append_and_stay_independent_of_parent() {
    let mut store = fresh_store();
    let task_id = store.add_task("move house").unwrap().unwrap();

    let first = store.add_subtask(task_id, " boxes ").unwrap().unwrap();
    let second = store.add_subtask(task_id, "van").unwrap().unwrap();
    assert_eq!(store.add_subtask(task_id, "  ").unwrap(), None);
    assert_eq!(store.add_subtask(Uuid::new_v4(), "orphan").unwrap(), None);

    store.set_task_done(task_id, true).unwrap();
    store.set_subtask_done(task_id, second, true).unwrap();
    assert!(store.update_subtask_text(task_id, first, "more boxes").unwrap());

    let task = &store.active_tab().unwrap().tasks[0];
    let texts: Vec<&str> = task.subtasks.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, ["more boxes", "van"]);
    assert!(!task.subtasks[0].done);
    assert!(task.subtasks[1].done);

    store.set_task_done(task_id, false).unwrap();
    assert!(store.active_tab().unwrap().tasks[0].subtasks[1].done);

    assert!(store.delete_subtask(task_id, first).unwrap());
    assert!(!store.delete_subtask(task_id, first).unwrap());
    assert_eq!(store.active_tab().unwrap().tasks[0].subtasks.len(), 1);
}

#[test]
fn reorder_moves_task_to_target_position() {
    let mut store = fresh_store();
    let c = store.add_task("c").unwrap().unwrap();
    store.add_task("b").unwrap().unwrap();
    let a = store.add_task("a").unwrap().unwrap();
    assert_eq!(task_texts(&store), ["a", "b", "c"]);

    assert!(store.reorder_task(a, c).unwrap());
    assert_eq!(task_texts(&store), ["b", "c", "a"]);

    let head = store.active_tab().unwrap().tasks[0].id;
    assert!(store.reorder_task(a, head).unwrap());
    assert_eq!(task_texts(&store), ["a", "b", "c"]);
}

#[test]
fn reorder_twice_restores_two_task_order() {
    let mut store = fresh_store();
    let b = store.add_task("b").unwrap().unwrap();
    let a = store.add_task("a").unwrap().unwrap();
    let original = store.document().clone();

    store.reorder_task(a, b).unwrap();
    assert_eq!(task_texts(&store), ["b", "a"]);
    store.reorder_task(b, a).unwrap();
    assert_eq!(store.document(), &original);
}

#[test]
fn reorder_rejects_self_unknown_and_cross_tab() {
    let mut store = fresh_store();
    let a = store.add_task("a").unwrap().unwrap();
    store.add_task("b").unwrap().unwrap();
    let before = store.document().clone();

    assert!(!store.reorder_task(a, a).unwrap());
    assert!(!store.reorder_task(a, Uuid::new_v4()).unwrap());

    store.add_tab().unwrap();
    let other = store.add_task("other").unwrap().unwrap();
    assert!(!store.reorder_task(a, other).unwrap());

    let first_tab = before.tabs[0].id;
    store.set_active_tab(first_tab).unwrap();
    assert_eq!(store.active_tab(), before.active_tab());
}

#[test]
fn invariants_hold_across_command_sequence() {
    let mut store = fresh_store();
    let mut created_tabs = Vec::new();

    for round in 0..12 {
        match store.apply(Command::AddTab) {
            Ok(CommandOutcome::Created(id)) => created_tabs.push(id),
            Ok(other) => panic!("unexpected outcome {other:?}"),
            Err(err) => assert!(matches!(err, StoreError::CapacityExceeded { .. })),
        }
        assert_invariants(&store);

        store
            .apply(Command::AddTask {
                text: format!("task {round}"),
            })
            .unwrap();
        assert_invariants(&store);

        if round % 3 == 0 {
            let target = store.document().active_tab_id;
            let _ = store.apply(Command::RemoveTab { tab_id: target });
            assert_invariants(&store);
        }
    }

    let ids: Vec<_> = store.document().tabs.iter().map(|tab| tab.id).collect();
    for id in ids {
        let _ = store.apply(Command::RemoveTab { tab_id: id });
        assert_invariants(&store);
    }
    assert_eq!(store.document().tabs.len(), 1);
}

//! Tests for workflow and automation persistence.
mod common;
use common::*;

use pipewright::store::{
    new_workflow, Automation, AutomationRun, FileStore, MemoryStore, RunStatus, ScheduleConfig,
    ScheduleFrequency, TriggerConfig, TriggerType, WorkflowStore,
};

fn sample_automation(id: &str, workflow_id: &str) -> Automation {
    Automation {
        id: id.to_string(),
        workflow_id: workflow_id.to_string(),
        name: "Nightly refresh".to_string(),
        description: None,
        active: true,
        trigger: TriggerConfig {
            trigger_type: TriggerType::Schedule,
            schedule: Some(ScheduleConfig {
                frequency: ScheduleFrequency::Daily,
                time_of_day: "02:00".to_string(),
                ..Default::default()
            }),
        },
        email: None,
        export: None,
        last_run: None,
    }
}

#[test]
fn saving_a_workflow_regenerates_its_sql() {
    let mut store = WorkflowStore::new(MemoryStore::new());
    let workflow = new_workflow("wf-1", "Adults", simple_pipeline(), "2024-01-01T00:00:00Z");
    store.save_workflow(workflow).unwrap();

    let loaded = store.workflow("wf-1").unwrap();
    assert_eq!(
        loaded.generated_sql,
        "SELECT * FROM (SELECT * FROM customers) t WHERE age > 30"
    );
}

#[test]
fn save_replaces_by_id() {
    let mut store = WorkflowStore::new(MemoryStore::new());
    store
        .save_workflow(new_workflow("wf-1", "First", simple_pipeline(), "t0"))
        .unwrap();
    let mut renamed = store.workflow("wf-1").unwrap();
    renamed.name = "Second".to_string();
    store.save_workflow(renamed).unwrap();

    let all = store.workflows().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Second");
}

#[test]
fn deleting_a_missing_workflow_fails() {
    let mut store = WorkflowStore::new(MemoryStore::new());
    assert!(store.delete_workflow("ghost").is_err());
}

#[test]
fn recording_a_run_stamps_the_automation() {
    let mut store = WorkflowStore::new(MemoryStore::new());
    store.save_automation(sample_automation("auto-1", "wf-1")).unwrap();
    store
        .record_run(AutomationRun {
            id: "run-1".to_string(),
            automation_id: "auto-1".to_string(),
            started_at: "2024-03-01T02:00:00Z".to_string(),
            status: RunStatus::Succeeded,
            message: None,
        })
        .unwrap();

    let automation = store.automation("auto-1").unwrap();
    assert_eq!(automation.last_run.as_deref(), Some("2024-03-01T02:00:00Z"));
    assert_eq!(store.runs_for("auto-1").unwrap().len(), 1);
    assert!(store.runs_for("other").unwrap().is_empty());
}

#[test]
fn file_store_persists_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = WorkflowStore::new(FileStore::open(dir.path()).unwrap());
        store
            .save_workflow(new_workflow("wf-1", "Persisted", simple_pipeline(), "t0"))
            .unwrap();
    }
    let store = WorkflowStore::new(FileStore::open(dir.path()).unwrap());
    let loaded = store.workflow("wf-1").unwrap();
    assert_eq!(loaded.name, "Persisted");
    assert_eq!(loaded.canvas_state.operators.len(), 2);
}

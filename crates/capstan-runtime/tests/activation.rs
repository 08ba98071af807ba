//! End-to-end activation scenarios through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use capstan_core::{LifecycleStage, ModuleId, Version};
use capstan_runtime::{
    ModuleDescriptor, ModuleError, Orchestrator, OrchestratorConfig, PatchTarget,
};

fn orchestrator() -> Orchestrator {
    Orchestrator::new(OrchestratorConfig::new("e2e-build").with_version(Version::new(1, 0, 0)))
}

#[test]
fn dependency_callback_runs_strictly_first() {
    let trace: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let mut orch = orchestrator();

    let x_trace = Rc::clone(&trace);
    orch.register(
        ModuleDescriptor::new(ModuleId::from_static("x")).on_stage(
            LifecycleStage::HookInstall,
            move |_| {
                x_trace.borrow_mut().push("x");
                Ok(())
            },
        ),
    )
    .unwrap();

    let y_trace = Rc::clone(&trace);
    orch.register(
        ModuleDescriptor::new(ModuleId::from_static("y"))
            .with_dependency(ModuleId::from_static("x"))
            .on_stage(LifecycleStage::HookInstall, move |_| {
                y_trace.borrow_mut().push("y");
                Ok(())
            }),
    )
    .unwrap();

    let report = orch.activate().unwrap();

    assert_eq!(*trace.borrow(), vec!["x", "y"]);
    assert!(report.is_activated(&ModuleId::from_static("x")));
    assert!(report.is_activated(&ModuleId::from_static("y")));
}

#[test]
fn cycle_members_excluded_independent_module_activates() {
    let mut orch = orchestrator();
    for (id, dep) in [("a", "b"), ("b", "c"), ("c", "a")] {
        orch.register(
            ModuleDescriptor::new(ModuleId::from_static(id))
                .with_dependency(ModuleId::from_static(dep)),
        )
        .unwrap();
    }
    orch.register(ModuleDescriptor::new(ModuleId::from_static("d")))
        .unwrap();

    let report = orch.activate().unwrap();

    assert_eq!(report.activated, vec![ModuleId::from_static("d")]);
    assert_eq!(report.excluded.len(), 3);
    assert!(orch.is_active(&ModuleId::from_static("d")));
    for id in ["a", "b", "c"] {
        assert!(!orch.is_active(&ModuleId::from_static(id)));
    }
}

#[test]
fn failing_module_does_not_disturb_siblings() {
    let mut orch = orchestrator();
    orch.register(
        ModuleDescriptor::new(ModuleId::from_static("fragile")).on_stage(
            LifecycleStage::PrePatch,
            |_| Err(ModuleError::failed("no thanks")),
        ),
    )
    .unwrap();
    orch.register(
        ModuleDescriptor::new(ModuleId::from_static("sturdy"))
            .on_stage(LifecycleStage::PrePatch, |_| Ok(())),
    )
    .unwrap();

    let report = orch.activate().unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0.as_str(), "fragile");
    assert!(orch.is_active(&ModuleId::from_static("sturdy")));
    assert!(!orch.is_active(&ModuleId::from_static("fragile")));
}

#[test]
fn patches_installed_during_activation_are_auditable() {
    let mut orch = orchestrator();
    orch.register(
        ModuleDescriptor::new(ModuleId::from_static("hooks")).on_stage(
            LifecycleStage::HookInstall,
            |ctx| {
                let module = ModuleId::from_static("hooks");
                ctx.patches_mut()
                    .install(&module, Some(PatchTarget::new("Host", "on-update")), || {});
                ctx.patches_mut().install(&module, None, || {});
                Ok(())
            },
        ),
    )
    .unwrap();

    orch.activate().unwrap();

    let records = orch.context().patches().records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].identifier(), "Host.on-update");
    assert_eq!(records[1].identifier(), "<unidentified>");
}

#[test]
fn duplicate_registration_leaves_original_intact() {
    let trace: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let mut orch = orchestrator();

    let first = Rc::clone(&trace);
    orch.register(
        ModuleDescriptor::new(ModuleId::from_static("twin")).on_stage(
            LifecycleStage::PostInit,
            move |_| {
                first.borrow_mut().push("first");
                Ok(())
            },
        ),
    )
    .unwrap();

    let second = Rc::clone(&trace);
    let duplicate = orch.register(
        ModuleDescriptor::new(ModuleId::from_static("twin")).on_stage(
            LifecycleStage::PostInit,
            move |_| {
                second.borrow_mut().push("second");
                Ok(())
            },
        ),
    );
    assert!(duplicate.is_err());

    orch.activate().unwrap();
    assert_eq!(*trace.borrow(), vec!["first"]);
}

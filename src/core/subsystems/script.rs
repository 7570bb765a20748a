//=========================================================================
// Script Engine Subsystem
//
// Lifecycle-visible surface of the scripting VM: start/stop, script
// execution accounting, and a garbage-collection hook driven by device
// memory-warning events. Scripting semantics are out of scope.
//
//=========================================================================

use log::{debug, info};

//=== ScriptEngine ========================================================

/// Engine-owned scripting VM handle.
pub struct ScriptEngine {
    running: bool,
    scripts_executed: u64,
    gc_cycles: u64,
}

impl ScriptEngine {
    /// Starts the VM.
    pub fn new() -> Self {
        info!(target: "subsystems", "ScriptEngine started");
        Self {
            running: true,
            scripts_executed: 0,
            gc_cycles: 0,
        }
    }

    /// Executes a named script. Fails once the VM is stopped.
    pub fn run_script(&mut self, name: &str) -> Result<(), String> {
        if !self.running {
            return Err(format!("script VM stopped, cannot run '{}'", name));
        }
        debug!(target: "subsystems", "Running script '{}'", name);
        self.scripts_executed += 1;
        Ok(())
    }

    /// Requests a garbage-collection cycle (e.g. on memory warnings).
    pub fn collect_garbage(&mut self) {
        if self.running {
            debug!(target: "subsystems", "Script GC cycle requested");
            self.gc_cycles += 1;
        }
    }

    //--- Queries --------------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scripts_executed(&self) -> u64 {
        self.scripts_executed
    }

    pub fn gc_cycles(&self) -> u64 {
        self.gc_cycles
    }

    //--- Teardown --------------------------------------------------------------

    /// Stops the VM. Fails if it was already stopped.
    pub fn shutdown(&mut self) -> Result<(), String> {
        if !self.running {
            return Err("script VM already stopped".into());
        }
        debug!(target: "subsystems", "ScriptEngine stopped");
        self.running = false;
        Ok(())
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

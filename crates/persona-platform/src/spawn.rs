//! Runs core tasks on the browser's microtask queue.

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};

#[derive(Default, Clone, Copy)]
pub struct WasmSpawner;

impl LocalSpawn for WasmSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

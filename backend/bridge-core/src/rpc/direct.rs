//! JSON-valued host accessors.

use crate::error::rpc::HandlerFailure;

use std::collections::HashMap;

use log::info;
use serde_json::Value;

type DirectFn = dyn Fn(Value) -> Result<Value, HandlerFailure> + Send + Sync;

#[derive(Default)]
pub struct DirectRegistry {
    functions: HashMap<String, Box<DirectFn>>,
}

impl DirectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(Value) -> Result<Value, HandlerFailure> + Send + Sync + 'static,
    {
        let name = name.into();
        info!("Registered direct function '{name}'");
        self.functions.insert(name, Box::new(func));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    #[track_caller]
    pub fn call(&self, name: &str, args: Value) -> Result<Value, HandlerFailure> {
        match self.functions.get(name) {
            Some(func) => func(args),
            None => Err(HandlerFailure::new(
                "UnknownFunction",
                format!("no direct function named '{name}'"),
            )),
        }
    }
}

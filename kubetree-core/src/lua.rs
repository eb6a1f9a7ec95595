use jiff::Timestamp;
use k8s_openapi::serde_json::{self, Value};
use mlua::prelude::*;
use serde::Serialize;
use std::backtrace::Backtrace;
use std::panic;
use tracing::error;

use crate::log::setup_logger;
use crate::panel::Panel;
use crate::processors::pod::print_pod_value;
use crate::rows::Frame;
use crate::structs::TreeOptions;
use crate::tree::DisplayNode;

#[derive(Serialize)]
struct BuildTreeOutput<'a> {
    tree: DisplayNode,
    expanded: &'a [String],
}

#[tracing::instrument(skip_all)]
fn build_tree(_lua: &Lua, (options_json, frames_json): (String, String)) -> LuaResult<String> {
    let options = TreeOptions::from_json(&options_json).map_err(LuaError::external)?;
    let frames: Vec<Frame> = serde_json::from_str(&frames_json)
        .map_err(|e| LuaError::external(format!("bad json: {e}")))?;

    let tree = Panel::new(options)
        .render(frames)
        .map_err(LuaError::external)?;

    serde_json::to_string(&BuildTreeOutput {
        tree: tree.view(),
        expanded: &tree.expanded,
    })
    .map_err(|e| LuaError::RuntimeError(e.to_string()))
}

fn print_pod(_lua: &Lua, pod_json: String) -> LuaResult<String> {
    let value: Value = serde_json::from_str(&pod_json)
        .map_err(|e| LuaError::external(format!("bad json: {e}")))?;
    let columns = print_pod_value(value, &Timestamp::now())
        .map_err(|e| LuaError::external(format!("bad pod: {e}")))?;

    serde_json::to_string(&columns).map_err(|e| LuaError::RuntimeError(e.to_string()))
}

#[mlua::lua_module(skip_memory_check)]
fn kubetree(lua: &Lua) -> LuaResult<mlua::Table> {
    let exports = lua.create_table()?;
    exports.set(
        "init_logging",
        lua.create_function(|_, path: String| {
            setup_logger(&path).map_err(|e| LuaError::external(format!("{:?}", e)))?;
            Ok(())
        })?,
    )?;

    let default = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let bt = Backtrace::force_capture();
        error!(target: "panic", "panic: {panic_info}\n\nBacktrace:\n{bt}");
        default(panic_info);
    }));

    exports.set("build_tree", lua.create_function(build_tree)?)?;
    exports.set("print_pod", lua.create_function(print_pod)?)?;

    Ok(exports)
}

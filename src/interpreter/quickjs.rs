// QuickJS interpreter for configuration scripts
//
// Each run creates its own QuickJS runtime and context, installs the host
// functions, evaluates the script as a classic (non-strict) global script
// and drains the job queue before the runtime is dropped.

use anyhow::{anyhow, Result};
use rquickjs::{
    context::EvalOptions,
    convert::Coerced,
    function::Rest,
    CatchResultExt, Context, Ctx, Function, Object, Runtime, Value,
};

use super::{Binding, ScriptInterpreter};
use crate::host::Host;

/// Runs scripts in a fresh QuickJS runtime per call
///
/// Globals available to scripts:
/// - `setMessage(text)` / `getMessage()` - Host system message
/// - `setProperty(key, value)` / `getProperty(key)` / `removeProperty(key)` - Host properties
/// - `console.log|info|warn|error|debug(...)` - Forwarded to the log
/// - `args` - Binding arguments, plus one global per binding variable
#[derive(Debug, Default, Clone, Copy)]
pub struct QuickJsInterpreter;

impl ScriptInterpreter for QuickJsInterpreter {
    fn run(&self, script: &str, script_name: &str, binding: &Binding, host: &Host) -> Result<()> {
        let runtime = Runtime::new()?;
        let context = Context::full(&runtime)?;

        context.with(|ctx| -> Result<()> {
            install_host_api(&ctx, host)?;
            install_console(&ctx, script_name)?;
            install_binding(&ctx, binding)?;

            let mut options = EvalOptions::default();
            options.strict = false;

            ctx.eval_with_options::<Value, _>(script, options)
                .catch(&ctx)
                .map(|_| ())
                .map_err(|e| anyhow!("{} failed: {}", script_name, e))
        })?;

        // Promise callbacks queued by the script still belong to this run
        loop {
            match runtime.execute_pending_job() {
                Ok(true) => continue,
                Ok(false) => break,
                Err(_) => anyhow::bail!("{} failed: uncaught error in pending job", script_name),
            }
        }

        Ok(())
    }
}

fn install_host_api(ctx: &Ctx<'_>, host: &Host) -> rquickjs::Result<()> {
    let globals = ctx.globals();

    let h = host.clone();
    globals.set(
        "setMessage",
        Function::new(ctx.clone(), move |message: Coerced<String>| {
            h.set_system_message(message.0);
        })?,
    )?;

    let h = host.clone();
    globals.set(
        "getMessage",
        Function::new(ctx.clone(), move || h.system_message())?,
    )?;

    let h = host.clone();
    globals.set(
        "setProperty",
        Function::new(ctx.clone(), move |key: Coerced<String>, value: Coerced<String>| {
            h.set_property(key.0, value.0);
        })?,
    )?;

    let h = host.clone();
    globals.set(
        "getProperty",
        Function::new(ctx.clone(), move |key: Coerced<String>| h.property(&key.0))?,
    )?;

    let h = host.clone();
    globals.set(
        "removeProperty",
        Function::new(ctx.clone(), move |key: Coerced<String>| h.remove_property(&key.0))?,
    )?;

    Ok(())
}

fn install_console(ctx: &Ctx<'_>, script_name: &str) -> rquickjs::Result<()> {
    let console = Object::new(ctx.clone())?;

    for level in ["log", "info", "warn", "error", "debug"] {
        let script = script_name.to_string();
        console.set(
            level,
            Function::new(ctx.clone(), move |args: Rest<Coerced<String>>| {
                let line = args
                    .0
                    .into_iter()
                    .map(|arg| arg.0)
                    .collect::<Vec<_>>()
                    .join(" ");
                match level {
                    "error" => tracing::error!(script = %script, "{}", line),
                    "warn" => tracing::warn!(script = %script, "{}", line),
                    "debug" => tracing::debug!(script = %script, "{}", line),
                    _ => tracing::info!(script = %script, "{}", line),
                }
            })?,
        )?;
    }

    ctx.globals().set("console", console)
}

fn install_binding(ctx: &Ctx<'_>, binding: &Binding) -> rquickjs::Result<()> {
    let globals = ctx.globals();
    for (name, value) in &binding.variables {
        globals.set(name.as_str(), value.as_str())?;
    }
    globals.set("args", binding.args.clone())
}

// SPDX-License-Identifier: MIT
//
// JS glue over the page-global browser analytics SDK.
//
// Resolved once at startup: if the global `clevertap` object is absent the
// loader is `None` and the web bridge stays disabled. The browser runtime
// is single-threaded, so the `Send`/`Sync` markers on wrapped JS values
// are sound — they never actually cross a thread.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::sync::Arc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use telemux_core::error::{Result, TelemuxError};
use telemux_core::{EventRecord, InstanceConfig, ProfileRecord, PropValue};

use crate::bridge::{WebSdkHandle, WebSdkLoader};

/// JS value pinned to the single-threaded browser runtime.
struct SendJs(JsValue);

// SAFETY: wasm32 without threads has exactly one thread; the value can
// never be observed concurrently.
unsafe impl Send for SendJs {}
unsafe impl Sync for SendJs {}

/// Loader over the global `clevertap` object, or `None` if the SDK script
/// never loaded.
pub fn global_loader() -> Option<Arc<dyn WebSdkLoader>> {
    let sdk = Reflect::get(&js_sys::global(), &JsValue::from_str("clevertap")).ok()?;
    if sdk.is_undefined() || sdk.is_null() {
        tracing::warn!("global clevertap object not found");
        return None;
    }
    Some(Arc::new(JsSdkLoader { sdk: SendJs(sdk) }))
}

fn js_err(context: &str, e: JsValue) -> TelemuxError {
    TelemuxError::Bridge(format!("{context}: {e:?}"))
}

fn prop_to_js(value: &PropValue) -> JsValue {
    match value {
        PropValue::Str(s) => JsValue::from_str(s),
        PropValue::Num(n) => JsValue::from_f64(*n),
        PropValue::Bool(b) => JsValue::from_bool(*b),
        PropValue::Date(dt) => {
            let millis = dt.and_utc().timestamp_millis() as f64;
            js_sys::Date::new(&JsValue::from_f64(millis)).into()
        }
        PropValue::List(items) => {
            let array = Array::new();
            for item in items {
                array.push(&prop_to_js(item));
            }
            array.into()
        }
    }
}

fn props_to_js_object(props: &telemux_core::PropMap) -> Object {
    let object = Object::new();
    for (key, value) in props {
        let _ = Reflect::set(&object, &JsValue::from_str(key), &prop_to_js(value));
    }
    object
}

/// Call `receiver.section.push(...)`, the browser SDK's recording shape.
fn call_push(receiver: &JsValue, section: &str, args: &Array) -> Result<()> {
    let section_obj =
        Reflect::get(receiver, &JsValue::from_str(section)).map_err(|e| js_err(section, e))?;
    let push: Function = Reflect::get(&section_obj, &JsValue::from_str("push"))
        .map_err(|e| js_err("push", e))?
        .dyn_into()
        .map_err(|_| TelemuxError::Bridge(format!("{section}.push is not a function")))?;
    push.apply(&section_obj, args)
        .map_err(|e| js_err("push.apply", e))?;
    Ok(())
}

struct JsSdkLoader {
    sdk: SendJs,
}

impl WebSdkLoader for JsSdkLoader {
    /// `clevertap.init({account, token, region, enablePersonalization})`.
    fn init(&self, config: &InstanceConfig) -> Result<Arc<dyn WebSdkHandle>> {
        let js_config = Object::new();
        let set = |key: &str, value: JsValue| {
            Reflect::set(&js_config, &JsValue::from_str(key), &value)
                .map_err(|e| js_err("config", e))
                .map(|_| ())
        };
        set("account", JsValue::from_str(&config.account_id))?;
        set("token", JsValue::from_str(&config.account_token))?;
        set("region", JsValue::from_str(&config.region))?;
        set("enablePersonalization", JsValue::from_bool(true))?;

        let init: Function = Reflect::get(&self.sdk.0, &JsValue::from_str("init"))
            .map_err(|e| js_err("init", e))?
            .dyn_into()
            .map_err(|_| TelemuxError::Init("clevertap.init is not a function".into()))?;
        let instance = init
            .call1(&self.sdk.0, &js_config)
            .map_err(|e| TelemuxError::Init(format!("clevertap.init threw: {e:?}")))?;
        if instance.is_undefined() || instance.is_null() {
            return Err(TelemuxError::Init("clevertap.init returned no instance".into()));
        }

        Ok(Arc::new(JsSdkHandle {
            instance: SendJs(instance),
        }))
    }
}

struct JsSdkHandle {
    instance: SendJs,
}

impl WebSdkHandle for JsSdkHandle {
    fn record_event(&self, event: &EventRecord) {
        let args = Array::new();
        args.push(&JsValue::from_str(&event.name));
        if !event.props.is_empty() {
            args.push(&props_to_js_object(&event.props).into());
        }
        if let Err(e) = call_push(&self.instance.0, "event", &args) {
            tracing::warn!(event = %event.name, error = %e, "web: event push failed");
        }
    }

    fn push_profile(&self, profile: &ProfileRecord) {
        let args = Array::new();
        args.push(&props_to_js_object(&profile.fields).into());
        if let Err(e) = call_push(&self.instance.0, "profile", &args) {
            tracing::warn!(error = %e, "web: profile push failed");
        }
    }

    fn clevertap_id(&self, callback: Box<dyn FnOnce(String) + Send>) {
        // The browser SDK answers through a one-shot JS callback; the
        // Closure leaks deliberately since the SDK may call it after we
        // return.
        let slot = RefCell::new(Some(callback));
        let js_callback = Closure::<dyn FnMut(JsValue)>::new(move |id: JsValue| {
            if let Some(cb) = slot.borrow_mut().take() {
                cb(id.as_string().unwrap_or_default());
            }
        });

        let result = Reflect::get(&self.instance.0, &JsValue::from_str("getCleverTapID"))
            .map_err(|e| js_err("getCleverTapID", e))
            .and_then(|f| {
                f.dyn_into::<Function>().map_err(|_| {
                    TelemuxError::Bridge("getCleverTapID is not a function".into())
                })
            })
            .and_then(|f| {
                f.call1(&self.instance.0, js_callback.as_ref())
                    .map_err(|e| js_err("getCleverTapID call", e))
            });

        match result {
            Ok(_) => js_callback.forget(),
            Err(e) => tracing::warn!(error = %e, "web: identifier retrieval failed"),
        }
    }
}

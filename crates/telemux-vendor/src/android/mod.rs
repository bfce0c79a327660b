// SPDX-License-Identifier: MIT
//
// Android vendor SDK glue via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Instance construction and every forwarded
// operation invoke the vendor's Java SDK (`CleverTapAPI`) through JNI
// calls into the ART runtime.
//
// Fire-and-forget operations catch JNI failures here and log them; only
// construction and identifier retrieval propagate errors to the caller.

#![cfg(target_os = "android")]

use std::sync::Arc;

use jni::objects::{GlobalRef, JObject, JValue};
use jni::JNIEnv;

use telemux_core::error::{Result, TelemuxError};
use telemux_core::{EventRecord, InstanceConfig, ProfileRecord, PropMap, PropValue};

use crate::traits::{VendorInstance, VendorSdk};

const SDK_CLASS: &str = "com/clevertap/android/sdk/CleverTapAPI";
const CONFIG_CLASS: &str = "com/clevertap/android/sdk/CleverTapInstanceConfig";

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Obtain the process [`jni::JavaVM`] from the global Android context.
///
/// Callers attach the current thread themselves; the attach guard borrows
/// the VM, so both must live in the same scope.
fn java_vm() -> Result<jni::JavaVM> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| TelemuxError::Bridge(format!("failed to obtain JavaVM: {e}")))
}

/// Obtain the hosting Android `Context` (the current Activity) as a
/// [`JObject`].
fn context() -> Result<JObject<'static>> {
    let ctx = ndk_context::android_context();
    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(TelemuxError::Bridge(
            "Android context is null; native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Convenience: map any `jni::errors::Error` into `TelemuxError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> TelemuxError {
    TelemuxError::Bridge(format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// Value conversion
// ---------------------------------------------------------------------------

/// Convert one coerced property value into a boxed Java object.
fn prop_to_java<'a>(env: &mut JNIEnv<'a>, value: &PropValue) -> Result<JObject<'a>> {
    match value {
        PropValue::Str(s) => Ok(env
            .new_string(s)
            .map_err(|e| jni_err("new_string(prop)", e))?
            .into()),
        PropValue::Num(n) => env
            .call_static_method(
                "java/lang/Double",
                "valueOf",
                "(D)Ljava/lang/Double;",
                &[JValue::Double(*n)],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err("Double.valueOf", e)),
        PropValue::Bool(b) => env
            .call_static_method(
                "java/lang/Boolean",
                "valueOf",
                "(Z)Ljava/lang/Boolean;",
                &[JValue::Bool((*b).into())],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err("Boolean.valueOf", e)),
        PropValue::Date(dt) => {
            let millis = dt.and_utc().timestamp_millis();
            env.new_object("java/util/Date", "(J)V", &[JValue::Long(millis)])
                .map_err(|e| jni_err("new Date", e))
        }
        PropValue::List(items) => {
            let list = env
                .new_object("java/util/ArrayList", "()V", &[])
                .map_err(|e| jni_err("new ArrayList", e))?;
            for item in items {
                let element = prop_to_java(env, item)?;
                env.call_method(
                    &list,
                    "add",
                    "(Ljava/lang/Object;)Z",
                    &[JValue::Object(&element)],
                )
                .map_err(|e| jni_err("ArrayList.add", e))?;
            }
            Ok(list)
        }
    }
}

/// Build a `java.util.HashMap` from a coerced property map.
fn props_to_java_map<'a>(env: &mut JNIEnv<'a>, props: &PropMap) -> Result<JObject<'a>> {
    let map = env
        .new_object("java/util/HashMap", "()V", &[])
        .map_err(|e| jni_err("new HashMap", e))?;
    for (key, value) in props {
        let j_key: JObject = env
            .new_string(key)
            .map_err(|e| jni_err("new_string(key)", e))?
            .into();
        let j_value = prop_to_java(env, value)?;
        env.call_method(
            &map,
            "put",
            "(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;",
            &[JValue::Object(&j_key), JValue::Object(&j_value)],
        )
        .map_err(|e| jni_err("HashMap.put", e))?;
    }
    Ok(map)
}

// ---------------------------------------------------------------------------
// SDK factory
// ---------------------------------------------------------------------------

/// Android implementation of the vendor SDK seam.
///
/// The struct is zero-sized; all state lives on the Java side. The first
/// JNI call happens lazily when an instance is created.
pub struct AndroidSdk;

impl AndroidSdk {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorSdk for AndroidSdk {
    fn platform_name(&self) -> &str {
        "Android"
    }

    /// `CleverTapInstanceConfig.createInstance(context, id, token, region)`
    /// followed by `CleverTapAPI.instanceWithConfig(context, config)`.
    ///
    /// The returned API object is pinned with a JNI global reference so it
    /// survives for the process lifetime, matching the registry's ownership
    /// model.
    fn create_instance(&self, config: &InstanceConfig) -> Result<Arc<dyn VendorInstance>> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| init_err("attach_current_thread", e))?;
        let ctx = context()?;

        tracing::info!(
            account_id = %config.account_id,
            region = %config.region,
            "Android: constructing vendor SDK instance"
        );

        let j_id: JObject = env
            .new_string(&config.account_id)
            .map_err(|e| init_err("new_string(account_id)", e))?
            .into();
        let j_token: JObject = env
            .new_string(&config.account_token)
            .map_err(|e| init_err("new_string(account_token)", e))?
            .into();
        let j_region: JObject = env
            .new_string(&config.region)
            .map_err(|e| init_err("new_string(region)", e))?
            .into();

        let instance_config = env
            .call_static_method(
                CONFIG_CLASS,
                "createInstance",
                "(Landroid/content/Context;Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)Lcom/clevertap/android/sdk/CleverTapInstanceConfig;",
                &[
                    JValue::Object(&ctx),
                    JValue::Object(&j_id),
                    JValue::Object(&j_token),
                    JValue::Object(&j_region),
                ],
            )
            .and_then(|v| v.l())
            .map_err(|e| init_err("CleverTapInstanceConfig.createInstance", e))?;

        let api = env
            .call_static_method(
                SDK_CLASS,
                "instanceWithConfig",
                "(Landroid/content/Context;Lcom/clevertap/android/sdk/CleverTapInstanceConfig;)Lcom/clevertap/android/sdk/CleverTapAPI;",
                &[JValue::Object(&ctx), JValue::Object(&instance_config)],
            )
            .and_then(|v| v.l())
            .map_err(|e| init_err("CleverTapAPI.instanceWithConfig", e))?;

        if api.is_null() {
            return Err(TelemuxError::Init(
                "CleverTapAPI.instanceWithConfig returned null".into(),
            ));
        }

        let api = env
            .new_global_ref(&api)
            .map_err(|e| init_err("new_global_ref", e))?;

        Ok(Arc::new(AndroidInstance { api }))
    }
}

/// Construction failures surface as `Init`, not `Bridge`, so the caller
/// sees the INIT_ERROR tag from the bridge contract.
fn init_err(context: &str, e: jni::errors::Error) -> TelemuxError {
    TelemuxError::Init(format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

/// One live `CleverTapAPI` object, pinned by a JNI global reference.
pub struct AndroidInstance {
    api: GlobalRef,
}

impl AndroidInstance {
    fn enable_personalization_inner(&self) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        env.call_method(self.api.as_obj(), "enablePersonalization", "()V", &[])
            .map_err(|e| jni_err("enablePersonalization", e))?;
        Ok(())
    }

    fn record_event_inner(&self, event: &EventRecord) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let j_name: JObject = env
            .new_string(&event.name)
            .map_err(|e| jni_err("new_string(event name)", e))?
            .into();

        if event.props.is_empty() {
            env.call_method(
                self.api.as_obj(),
                "pushEvent",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&j_name)],
            )
            .map_err(|e| jni_err("pushEvent(name)", e))?;
        } else {
            let map = props_to_java_map(&mut env, &event.props)?;
            env.call_method(
                self.api.as_obj(),
                "pushEvent",
                "(Ljava/lang/String;Ljava/util/Map;)V",
                &[JValue::Object(&j_name), JValue::Object(&map)],
            )
            .map_err(|e| jni_err("pushEvent(name, props)", e))?;
        }
        Ok(())
    }

    fn on_user_login_inner(&self, profile: &ProfileRecord) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let map = props_to_java_map(&mut env, &profile.fields)?;
        env.call_method(
            self.api.as_obj(),
            "onUserLogin",
            "(Ljava/util/Map;)V",
            &[JValue::Object(&map)],
        )
        .map_err(|e| jni_err("onUserLogin", e))?;
        Ok(())
    }

    fn notification_viewed_inner(&self, payload: &PropMap) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        // The Java API takes the notification extras as a Bundle of strings.
        let bundle = env
            .new_object("android/os/Bundle", "()V", &[])
            .map_err(|e| jni_err("new Bundle", e))?;
        for (key, value) in payload {
            let rendered = match value {
                PropValue::Str(s) => s.clone(),
                PropValue::Num(n) => n.to_string(),
                PropValue::Bool(b) => b.to_string(),
                PropValue::Date(dt) => dt.to_string(),
                PropValue::List(_) => continue, // extras carry scalars only
            };
            let j_key: JObject = env
                .new_string(key)
                .map_err(|e| jni_err("new_string(extra key)", e))?
                .into();
            let j_value: JObject = env
                .new_string(&rendered)
                .map_err(|e| jni_err("new_string(extra value)", e))?
                .into();
            env.call_method(
                &bundle,
                "putString",
                "(Ljava/lang/String;Ljava/lang/String;)V",
                &[JValue::Object(&j_key), JValue::Object(&j_value)],
            )
            .map_err(|e| jni_err("Bundle.putString", e))?;
        }
        env.call_method(
            self.api.as_obj(),
            "pushNotificationViewedEvent",
            "(Landroid/os/Bundle;)V",
            &[JValue::Object(&bundle)],
        )
        .map_err(|e| jni_err("pushNotificationViewedEvent", e))?;
        Ok(())
    }

    fn lifecycle_inner(&self, resumed: bool) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        if resumed {
            let activity = context()?;
            env.call_static_method(
                SDK_CLASS,
                "onActivityResumed",
                "(Landroid/app/Activity;)V",
                &[JValue::Object(&activity)],
            )
            .map_err(|e| jni_err("onActivityResumed", e))?;
        } else {
            env.call_static_method(SDK_CLASS, "onActivityPaused", "()V", &[])
                .map_err(|e| jni_err("onActivityPaused", e))?;
        }
        Ok(())
    }
}

impl VendorInstance for AndroidInstance {
    fn enable_personalization(&self) {
        if let Err(e) = self.enable_personalization_inner() {
            tracing::warn!(error = %e, "Android: enablePersonalization failed");
        }
    }

    fn record_event(&self, event: &EventRecord) {
        if let Err(e) = self.record_event_inner(event) {
            tracing::warn!(event = %event.name, error = %e, "Android: pushEvent failed");
        }
    }

    fn on_user_login(&self, profile: &ProfileRecord) {
        if let Err(e) = self.on_user_login_inner(profile) {
            tracing::warn!(error = %e, "Android: onUserLogin failed");
        }
    }

    fn clevertap_id(&self) -> Result<String> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let id = env
            .call_method(self.api.as_obj(), "getCleverTapID", "()Ljava/lang/String;", &[])
            .and_then(|v| v.l())
            .map_err(|e| jni_err("getCleverTapID", e))?;
        if id.is_null() {
            // The SDK has not assigned an identifier yet.
            return Ok(String::new());
        }
        let id: String = env
            .get_string(&id.into())
            .map_err(|e| jni_err("get_string(id)", e))?
            .into();
        Ok(id)
    }

    fn record_notification_viewed(&self, payload: &PropMap) {
        if let Err(e) = self.notification_viewed_inner(payload) {
            tracing::warn!(error = %e, "Android: pushNotificationViewedEvent failed");
        }
    }

    fn activity_resumed(&self) {
        if let Err(e) = self.lifecycle_inner(true) {
            tracing::warn!(error = %e, "Android: onActivityResumed failed");
        }
    }

    fn activity_paused(&self) {
        if let Err(e) = self.lifecycle_inner(false) {
            tracing::warn!(error = %e, "Android: onActivityPaused failed");
        }
    }
}

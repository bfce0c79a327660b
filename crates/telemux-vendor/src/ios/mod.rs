// SPDX-License-Identifier: MIT
//
// iOS vendor SDK glue via objc2.
//
// Requires compilation with the iOS SDK (Xcode) and the vendor's
// Objective-C framework linked into the host app. The CleverTap classes
// are not wrapped by objc2 bindings, so they are resolved by name at
// runtime and driven through raw message sends.
//
// The vendor SDK is documented thread-safe, so instance handles are marked
// Send/Sync; activity lifecycle on iOS is observed by the SDK itself
// through UIApplication notifications, making the explicit lifecycle
// forwarders no-ops here.

#![cfg(target_os = "ios")]

use std::sync::Arc;

use objc2::rc::{Allocated, Retained};
use objc2::runtime::{AnyClass, AnyObject, NSObject};
use objc2::msg_send;
use objc2_foundation::{NSMutableArray, NSMutableDictionary, NSNumber, NSString};

use telemux_core::error::{Result, TelemuxError};
use telemux_core::{EventRecord, InstanceConfig, ProfileRecord, PropMap, PropValue};

use crate::traits::{VendorInstance, VendorSdk};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve one of the vendor SDK's Objective-C classes by name.
fn sdk_class(name: &'static std::ffi::CStr) -> Result<&'static AnyClass> {
    AnyClass::get(name).ok_or_else(|| {
        TelemuxError::Bridge(format!(
            "class {name:?} not found; is the vendor framework linked?"
        ))
    })
}

/// Convert one coerced property value into a retained Foundation object.
fn prop_to_ns(value: &PropValue) -> Retained<NSObject> {
    match value {
        PropValue::Str(s) => Retained::into_super(NSString::from_str(s)),
        PropValue::Num(n) => Retained::into_super(Retained::into_super(NSNumber::new_f64(*n))),
        PropValue::Bool(b) => Retained::into_super(Retained::into_super(NSNumber::new_bool(*b))),
        PropValue::Date(dt) => {
            let secs = dt.and_utc().timestamp_millis() as f64 / 1000.0;
            // SAFETY: +[NSDate dateWithTimeIntervalSince1970:] is a
            // well-known Foundation constructor returning a retained object.
            unsafe {
                let cls = AnyClass::get(c"NSDate").expect("NSDate always present");
                msg_send![cls, dateWithTimeIntervalSince1970: secs]
            }
        }
        PropValue::List(items) => {
            let array: Retained<NSMutableArray<NSObject>> = NSMutableArray::new();
            for item in items {
                let element = prop_to_ns(item);
                // SAFETY: -[NSMutableArray addObject:] with a valid object.
                unsafe {
                    let _: () = msg_send![&array, addObject: &*element];
                }
            }
            Retained::into_super(Retained::into_super(array))
        }
    }
}

/// Build an `NSDictionary` from a coerced property map.
fn props_to_ns_dict(props: &PropMap) -> Retained<NSMutableDictionary<NSString, NSObject>> {
    let dict: Retained<NSMutableDictionary<NSString, NSObject>> = NSMutableDictionary::new();
    for (key, value) in props {
        let ns_key = NSString::from_str(key);
        let ns_value = prop_to_ns(value);
        // SAFETY: -[NSMutableDictionary setObject:forKey:] with valid,
        // retained arguments.
        unsafe {
            let _: () = msg_send![&dict, setObject: &*ns_value, forKey: &*ns_key];
        }
    }
    dict
}

// ---------------------------------------------------------------------------
// SDK factory
// ---------------------------------------------------------------------------

/// iOS implementation of the vendor SDK seam.
pub struct IosSdk;

impl IosSdk {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IosSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorSdk for IosSdk {
    fn platform_name(&self) -> &str {
        "iOS"
    }

    /// `-[CleverTapInstanceConfig initWithAccountId:accountToken:accountRegion:]`
    /// followed by `+[CleverTap instanceWithConfig:]`, with `analyticsOnly`
    /// cleared so personalization and system events are captured.
    fn create_instance(&self, config: &InstanceConfig) -> Result<Arc<dyn VendorInstance>> {
        let config_class = sdk_class(c"CleverTapInstanceConfig")?;
        let sdk = sdk_class(c"CleverTap")?;

        tracing::info!(
            account_id = %config.account_id,
            region = %config.region,
            "iOS: constructing vendor SDK instance"
        );

        let ns_id = NSString::from_str(&config.account_id);
        let ns_token = NSString::from_str(&config.account_token);
        let ns_region = NSString::from_str(&config.region);

        // SAFETY: standard alloc/init message sends to the vendor config
        // class; selector shapes come from the vendor's public headers.
        let instance_config: Option<Retained<AnyObject>> = unsafe {
            let allocated: Allocated<AnyObject> = msg_send![config_class, alloc];
            msg_send![
                allocated,
                initWithAccountId: &*ns_id,
                accountToken: &*ns_token,
                accountRegion: &*ns_region,
            ]
        };
        let instance_config = instance_config.ok_or_else(|| {
            TelemuxError::Init("CleverTapInstanceConfig rejected the configuration".into())
        })?;

        // SAFETY: setAnalyticsOnly: takes a BOOL.
        unsafe {
            let _: () = msg_send![&instance_config, setAnalyticsOnly: false];
        }

        // SAFETY: +[CleverTap instanceWithConfig:] returns a retained
        // shared instance, or nil on rejected configuration.
        let instance: Option<Retained<AnyObject>> =
            unsafe { msg_send![sdk, instanceWithConfig: &*instance_config] };
        let instance = instance.ok_or_else(|| {
            TelemuxError::Init("CleverTap.instanceWithConfig returned nil".into())
        })?;

        Ok(Arc::new(IosInstance {
            handle: SdkHandle(instance),
        }))
    }
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

/// Retained vendor instance pointer.
///
/// SAFETY: the vendor SDK documents its instance API as thread-safe; the
/// handle is only ever used through message sends.
struct SdkHandle(Retained<AnyObject>);

unsafe impl Send for SdkHandle {}
unsafe impl Sync for SdkHandle {}

/// One live CleverTap instance on iOS.
pub struct IosInstance {
    handle: SdkHandle,
}

impl VendorInstance for IosInstance {
    fn enable_personalization(&self) {
        // SAFETY: -[CleverTap enablePersonalization] takes no arguments.
        unsafe {
            let _: () = msg_send![&self.handle.0, enablePersonalization];
        }
    }

    fn record_event(&self, event: &EventRecord) {
        let ns_name = NSString::from_str(&event.name);
        if event.props.is_empty() {
            // SAFETY: -[CleverTap recordEvent:] with a retained NSString.
            unsafe {
                let _: () = msg_send![&self.handle.0, recordEvent: &*ns_name];
            }
        } else {
            let dict = props_to_ns_dict(&event.props);
            // SAFETY: -[CleverTap recordEvent:withProps:].
            unsafe {
                let _: () = msg_send![&self.handle.0, recordEvent: &*ns_name, withProps: &*dict];
            }
        }
    }

    fn on_user_login(&self, profile: &ProfileRecord) {
        let dict = props_to_ns_dict(&profile.fields);
        // SAFETY: -[CleverTap onUserLogin:] with a retained NSDictionary.
        unsafe {
            let _: () = msg_send![&self.handle.0, onUserLogin: &*dict];
        }
    }

    fn clevertap_id(&self) -> Result<String> {
        // SAFETY: -[CleverTap profileGetCleverTapID] returns a nullable
        // NSString; nil means the SDK has not assigned an identifier yet.
        let id: Option<Retained<NSString>> =
            unsafe { msg_send![&self.handle.0, profileGetCleverTapID] };
        Ok(id.map(|s| s.to_string()).unwrap_or_default())
    }

    fn record_notification_viewed(&self, payload: &PropMap) {
        let dict = props_to_ns_dict(payload);
        // SAFETY: -[CleverTap recordNotificationViewedEventWithData:].
        unsafe {
            let _: () = msg_send![&self.handle.0, recordNotificationViewedEventWithData: &*dict];
        }
    }

    fn activity_resumed(&self) {
        // The iOS SDK observes UIApplication lifecycle notifications itself.
        tracing::debug!("iOS: lifecycle handled by the SDK's own observers");
    }

    fn activity_paused(&self) {
        tracing::debug!("iOS: lifecycle handled by the SDK's own observers");
    }
}

use core_foundation::{
    array::CFArray,
    base::{CFTypeID, TCFType},
    boolean::CFBoolean,
    declare_TCFType, impl_TCFType,
    string::{CFString, CFStringRef},
};
use core_graphics::geometry::{CGPoint, CGSize};
use std::ffi::c_void;
use std::ptr;

pub type AXError = i32;
pub const AX_ERROR_SUCCESS: AXError = 0;
pub const AX_ERROR_FAILURE: AXError = -25200;
pub const AX_ERROR_CANNOT_COMPLETE: AXError = -25204;
pub const AX_ERROR_API_DISABLED: AXError = -25211;
pub const AX_ERROR_NO_VALUE: AXError = -25212;

#[repr(C)]
pub struct __AXUIElement(c_void);
pub type AXUIElementRef = *mut __AXUIElement;

declare_TCFType!(AXUIElement, AXUIElementRef);
impl_TCFType!(AXUIElement, AXUIElementRef, AXUIElementGetTypeID);

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXUIElementGetTypeID() -> CFTypeID;
    fn AXIsProcessTrustedWithOptions(options: *const c_void) -> bool;
    fn AXUIElementCreateApplication(pid: i32) -> AXUIElementRef;
    fn AXUIElementCopyAttributeValue(
        element: AXUIElementRef,
        attribute: CFStringRef,
        value: *mut *mut c_void,
    ) -> AXError;
    fn AXUIElementSetAttributeValue(
        element: AXUIElementRef,
        attribute: CFStringRef,
        value: *const c_void,
    ) -> AXError;
    fn AXValueCreate(value_type: u32, value: *const c_void) -> *mut c_void;
}

const AX_VALUE_TYPE_CGPOINT: u32 = 1;
const AX_VALUE_TYPE_CGSIZE: u32 = 2;

mod attr {
    pub const WINDOWS: &str = "AXWindows";
    pub const TITLE: &str = "AXTitle";
    pub const POSITION: &str = "AXPosition";
    pub const SIZE: &str = "AXSize";
}

/// Whether this process may control other apps, asking the system to show the
/// Accessibility permission dialog when it may not.
pub fn is_trusted_with_prompt() -> bool {
    use core_foundation::dictionary::CFDictionary;

    let key = CFString::new("AXTrustedCheckOptionPrompt");
    let dict = CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);

    unsafe { AXIsProcessTrustedWithOptions(dict.as_concrete_TypeRef() as *const c_void) }
}

pub fn describe_ax_error(err: AXError) -> String {
    match err {
        AX_ERROR_FAILURE => "AX failure".to_string(),
        AX_ERROR_CANNOT_COMPLETE => "AX cannot complete (app busy or not responding)".to_string(),
        AX_ERROR_API_DISABLED => "AX API disabled".to_string(),
        AX_ERROR_NO_VALUE => "AX no value".to_string(),
        other => format!("AX error {}", other),
    }
}

impl AXUIElement {
    pub fn application(pid: i32) -> Self {
        unsafe {
            let raw = AXUIElementCreateApplication(pid);
            Self::wrap_under_create_rule(raw)
        }
    }

    fn get_attribute(&self, name: &str) -> Result<*mut c_void, AXError> {
        let attr = CFString::new(name);
        let mut value: *mut c_void = ptr::null_mut();
        let err = unsafe {
            AXUIElementCopyAttributeValue(
                self.as_concrete_TypeRef(),
                attr.as_concrete_TypeRef(),
                &mut value,
            )
        };
        if err == AX_ERROR_SUCCESS && !value.is_null() {
            Ok(value)
        } else if err == AX_ERROR_SUCCESS {
            Err(AX_ERROR_NO_VALUE)
        } else {
            Err(err)
        }
    }

    fn set_attribute(&self, name: &str, value: *const c_void) -> Result<(), AXError> {
        let attr = CFString::new(name);
        let err = unsafe {
            AXUIElementSetAttributeValue(
                self.as_concrete_TypeRef(),
                attr.as_concrete_TypeRef(),
                value,
            )
        };
        if err == AX_ERROR_SUCCESS {
            Ok(())
        } else {
            Err(err)
        }
    }

    pub fn title(&self) -> Result<String, AXError> {
        let value = self.get_attribute(attr::TITLE)?;
        let cf = unsafe { CFString::wrap_under_create_rule(value as *const _) };
        Ok(cf.to_string())
    }

    pub fn set_position(&self, point: CGPoint) -> Result<(), AXError> {
        let value = unsafe {
            AXValueCreate(
                AX_VALUE_TYPE_CGPOINT,
                &point as *const CGPoint as *const c_void,
            )
        };
        if value.is_null() {
            return Err(AX_ERROR_FAILURE);
        }
        // AXValueCreate follows the create rule; the CFType releases it on drop.
        let value = unsafe { core_foundation::base::CFType::wrap_under_create_rule(value as _) };
        self.set_attribute(attr::POSITION, value.as_CFTypeRef())
    }

    pub fn set_size(&self, size: CGSize) -> Result<(), AXError> {
        let value = unsafe {
            AXValueCreate(
                AX_VALUE_TYPE_CGSIZE,
                &size as *const CGSize as *const c_void,
            )
        };
        if value.is_null() {
            return Err(AX_ERROR_FAILURE);
        }
        let value = unsafe { core_foundation::base::CFType::wrap_under_create_rule(value as _) };
        self.set_attribute(attr::SIZE, value.as_CFTypeRef())
    }

    pub fn windows(&self) -> Result<Vec<AXUIElement>, AXError> {
        let value = self.get_attribute(attr::WINDOWS)?;
        let arr: CFArray = unsafe { CFArray::wrap_under_create_rule(value as *const _) };
        let mut result = Vec::with_capacity(arr.len() as usize);
        for i in 0..arr.len() {
            let elem = unsafe {
                let ptr = *arr.get_unchecked(i);
                AXUIElement::wrap_under_get_rule(ptr as AXUIElementRef)
            };
            result.push(elem);
        }
        Ok(result)
    }
}

//! Test doubles shared by the unit tests.
//!
//! `Widget` exposes `IWidget` and `IGadget`; nothing implements
//! `ISprocket`. Every widget reports its destruction to a `DropLog`.

use core::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::iface::{factory_entry, ClassFactoryImpl, IUnknown, IUnknownVtbl, Interface, InterfaceEntry};
use crate::object::{unknown_vtable, Class, ComObject, ComPtr};
use crate::status::{HResult, Result};

/// Current count of an object, observed through a neutral add/release pair.
pub fn ref_count(unknown: &IUnknown) -> u32 {
    let count = unknown.add_ref();
    // SAFETY: releases the reference added above.
    unsafe { unknown.release() };
    count - 1
}

/// Counts destructions.
#[derive(Clone, Default)]
pub struct DropLog {
    drops: Arc<AtomicUsize>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    pub fn record(&self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[repr(C)]
pub struct IWidgetVtbl {
    pub base: IUnknownVtbl,
    pub value: unsafe extern "system" fn(this: *mut c_void) -> u32,
}

crate::interface! {
    pub struct IWidget(IWidgetVtbl) = "6A0D3B51-2F8E-4C7A-9B15-0E4D2C3B1A01";
}

impl IWidget {
    pub fn value(&self) -> u32 {
        let value = self.vtable().value;
        // SAFETY: `self` is a live widget.
        unsafe { value(self.as_raw().as_ptr()) }
    }
}

#[repr(C)]
pub struct IGadgetVtbl {
    pub base: IUnknownVtbl,
    pub doubled: unsafe extern "system" fn(this: *mut c_void) -> u32,
}

crate::interface! {
    pub struct IGadget(IGadgetVtbl) = "6A0D3B51-2F8E-4C7A-9B15-0E4D2C3B1A02";
}

impl IGadget {
    pub fn doubled(&self) -> u32 {
        let doubled = self.vtable().doubled;
        // SAFETY: `self` is a live gadget.
        unsafe { doubled(self.as_raw().as_ptr()) }
    }
}

crate::interface! {
    pub struct ISprocket(IUnknownVtbl) = "6A0D3B51-2F8E-4C7A-9B15-0E4D2C3B1A03";
}

pub struct Widget {
    pub value: u32,
    log: DropLog,
}

impl Widget {
    const WIDGET_VTABLE: IWidgetVtbl = IWidgetVtbl {
        base: unknown_vtable::<Widget>(),
        value: widget_value,
    };

    const GADGET_VTABLE: IGadgetVtbl = IGadgetVtbl {
        base: unknown_vtable::<Widget>(),
        doubled: gadget_doubled,
    };

    pub fn create(value: u32, log: &DropLog) -> ComPtr<IUnknown> {
        ComObject::create(Widget {
            value,
            log: log.clone(),
        })
        .unwrap()
    }
}

impl Class for Widget {
    // SAFETY: both vtables resolve `this` as a ComObject<Widget>.
    const INTERFACES: &'static [InterfaceEntry] = &[
        unsafe { InterfaceEntry::new::<IWidget>(&Widget::WIDGET_VTABLE) },
        unsafe { InterfaceEntry::new::<IGadget>(&Widget::GADGET_VTABLE) },
    ];
}

impl Drop for Widget {
    fn drop(&mut self) {
        self.log.record();
    }
}

unsafe extern "system" fn widget_value(this: *mut c_void) -> u32 {
    // SAFETY: only installed in ComObject<Widget> slots.
    unsafe { ComObject::<Widget>::from_this(this) }.value
}

unsafe extern "system" fn gadget_doubled(this: *mut c_void) -> u32 {
    // SAFETY: only installed in ComObject<Widget> slots.
    unsafe { ComObject::<Widget>::from_this(this) }.value * 2
}

/// Factory minting widgets, optionally failing every construction.
pub struct WidgetFactory {
    pub value: u32,
    pub fail_with: Option<HResult>,
    pub log: DropLog,
}

impl WidgetFactory {
    pub fn create(value: u32, log: &DropLog) -> ComPtr<IUnknown> {
        Self::create_failing(value, None, log)
    }

    pub fn create_failing(value: u32, fail_with: Option<HResult>, log: &DropLog) -> ComPtr<IUnknown> {
        ComObject::create(WidgetFactory {
            value,
            fail_with,
            log: log.clone(),
        })
        .unwrap()
    }
}

impl Class for WidgetFactory {
    const INTERFACES: &'static [InterfaceEntry] = &[factory_entry::<WidgetFactory>()];
}

impl ClassFactoryImpl for WidgetFactory {
    fn construct(&self) -> Result<ComPtr<IUnknown>> {
        if let Some(hr) = self.fail_with {
            return Err(hr);
        }
        ComObject::create(Widget {
            value: self.value,
            log: self.log.clone(),
        })
    }
}

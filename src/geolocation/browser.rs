//! Browser positioning through `navigator.geolocation`.

use super::{GeoPosition, GeolocationError, GeolocationOptions, GeolocationProvider};
use async_trait::async_trait;
use futures::channel::oneshot;
use js_sys::Reflect;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

type Reply = Rc<RefCell<Option<oneshot::Sender<Result<GeoPosition, GeolocationError>>>>>;

/// Calls `getCurrentPosition` once per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocator;

fn number_field(value: &JsValue, name: &str) -> Option<f64> {
    Reflect::get(value, &JsValue::from_str(name)).ok()?.as_f64()
}

fn parse_position(position: &JsValue) -> Result<GeoPosition, GeolocationError> {
    let coords = Reflect::get(position, &JsValue::from_str("coords"))
        .map_err(|_| GeolocationError::PositionUnavailable)?;
    let latitude = number_field(&coords, "latitude").ok_or(GeolocationError::PositionUnavailable)?;
    let longitude = number_field(&coords, "longitude").ok_or(GeolocationError::PositionUnavailable)?;
    Ok(GeoPosition {
        latitude,
        longitude,
        accuracy: number_field(&coords, "accuracy"),
    })
}

fn parse_error(error: &JsValue) -> GeolocationError {
    let code = number_field(error, "code").unwrap_or(0.0) as u16;
    let message = Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_default();
    GeolocationError::from_code(code, message)
}

fn send(reply: &Reply, result: Result<GeoPosition, GeolocationError>) {
    if let Some(tx) = reply.borrow_mut().take() {
        let _ = tx.send(result);
    }
}

impl BrowserLocator {
    /// Issues the request and returns the receiving end. Everything that is
    /// not `Send` stays inside this function.
    fn request(
        options: &GeolocationOptions,
    ) -> Result<oneshot::Receiver<Result<GeoPosition, GeolocationError>>, GeolocationError> {
        let window = web_sys::window().ok_or(GeolocationError::Unsupported)?;
        let geolocation = window
            .navigator()
            .geolocation()
            .map_err(|_| GeolocationError::Unsupported)?;

        let (tx, rx) = oneshot::channel();
        let reply: Reply = Rc::new(RefCell::new(Some(tx)));

        let on_success = {
            let reply = reply.clone();
            Closure::once_into_js(move |position: JsValue| send(&reply, parse_position(&position)))
        };
        let on_error = {
            let reply = reply.clone();
            Closure::once_into_js(move |error: JsValue| send(&reply, Err(parse_error(&error))))
        };

        let js_options = web_sys::PositionOptions::new();
        js_options.set_enable_high_accuracy(options.enable_high_accuracy);
        js_options.set_timeout(options.timeout_ms.min(u32::MAX as u64) as u32);
        js_options.set_maximum_age(options.maximum_age_ms.min(u32::MAX as u64) as u32);

        geolocation
            .get_current_position_with_error_callback_and_options(
                on_success.unchecked_ref(),
                Some(on_error.unchecked_ref()),
                &js_options,
            )
            .map_err(|e| GeolocationError::Unknown(format!("{:?}", e)))?;

        Ok(rx)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl GeolocationProvider for BrowserLocator {
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<GeoPosition, GeolocationError> {
        let rx = Self::request(options)?;
        rx.await
            .unwrap_or_else(|_| Err(GeolocationError::Unknown("request dropped".to_string())))
    }
}

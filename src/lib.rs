//! # qrcraft
//!
//! Build, style and export QR codes for common payload kinds.
//!
//! `qrcraft` turns structured input (a URL, free text, an email address, a
//! phone number, an SMS, Wi-Fi credentials or a contact card) into the exact
//! text scanners expect, renders it at the highest error-correction level with
//! custom colors and an optional center logo, and exports the result as PNG or
//! SVG. A small most-recent-first history of exported codes is kept through a
//! pluggable storage port.
//!
//! ## Features
//!
//! - Payload encoding for URL, Text, Email, Phone, SMS, Wi-Fi and vCard.
//! - Square RGBA rendering at any pixel size with a one-module quiet zone.
//! - Logo overlay from a data URI, raw bytes or a file.
//! - PNG, PNG data URL and SVG export; share through a [`export::ShareTarget`].
//! - Five-entry export history, deduplicated by payload, stored as JSON.
//!
//! ## Example
//!
//! ```rust
//! use qrcraft::payload::{Payload, SmsMessage};
//! use qrcraft::render::render_image;
//! use qrcraft::style::StyleOptions;
//!
//! let sms = Payload::Sms(SmsMessage { phone: "+1234".into(), message: "hi".into() });
//! assert_eq!(sms.encode(), "SMSTO:+1234:hi");
//!
//! let img = render_image(&sms.qr_text(), &StyleOptions::default()).unwrap();
//! assert_eq!(img.dimensions(), (350, 350));
//! ```
//!
//! ## Modules
//!
//! - [`payload`]: payload kinds and their text encodings.
//! - [`render`]: matrix rasterization, logo overlay and the drawing surface.
//! - [`export`]: PNG/SVG output and sharing.
//! - [`history`]: recent exports.
//! - [`studio`]: an editing session tying the above together.

pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod logging;
pub mod logo;
pub mod matrix;
pub mod payload;
pub mod render;
pub mod studio;
pub mod style;

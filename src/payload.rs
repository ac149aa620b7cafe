//! Payload encoding.
//!
//! Maps structured user input for each [`PayloadKind`] onto the literal text a
//! QR scanner expects. Encoding is pure and total: it never fails and the same
//! input always produces the same string.
//!
//! Field values are passed through verbatim. Characters that act as delimiters
//! in the Wi-Fi and vCard formats (`;`, `:`, `,`, newline) are **not** escaped,
//! so a network name such as `a;b` produces a string scanners will split in the
//! wrong place. Callers that care can inspect [`delimiter_hazards`] and warn.
//!
//! # Example
//!
//! ```rust
//! use qrcraft::payload::{encode, Payload, WifiCredentials, WifiEncryption};
//!
//! let wifi = Payload::Wifi(WifiCredentials {
//!     ssid: "Home".into(),
//!     password: "secret1".into(),
//!     encryption: WifiEncryption::Wpa,
//!     hidden: false,
//! });
//! assert_eq!(encode(&wifi), "WIFI:T:WPA;S:Home;P:secret1;H:false;;");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest label kept in history before truncation.
pub const LABEL_MAX_CHARS: usize = 20;

/// Appended to labels that were cut at [`LABEL_MAX_CHARS`].
pub const ELLIPSIS: &str = "...";

/// Text handed to the rasterizer when the composed payload is empty.
pub const EMPTY_SUBSTITUTE: &str = " ";

/// The closed set of payload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadKind {
    #[serde(rename = "URL")]
    Url,
    #[serde(rename = "Text")]
    Text,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "Phone")]
    Phone,
    #[serde(rename = "SMS")]
    Sms,
    #[serde(rename = "Wi-Fi")]
    Wifi,
    #[serde(rename = "vCard")]
    VCard,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 7] = [
        PayloadKind::Url,
        PayloadKind::Text,
        PayloadKind::Email,
        PayloadKind::Phone,
        PayloadKind::Sms,
        PayloadKind::Wifi,
        PayloadKind::VCard,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            PayloadKind::Url => "URL",
            PayloadKind::Text => "Text",
            PayloadKind::Email => "Email",
            PayloadKind::Phone => "Phone",
            PayloadKind::Sms => "SMS",
            PayloadKind::Wifi => "Wi-Fi",
            PayloadKind::VCard => "vCard",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Wi-Fi authentication tag as written in the `T:` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiEncryption {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    None,
}

impl WifiEncryption {
    pub fn tag(self) -> &'static str {
        match self {
            WifiEncryption::Wpa => "WPA",
            WifiEncryption::Wep => "WEP",
            WifiEncryption::None => "nopass",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
    pub encryption: WifiEncryption,
    pub hidden: bool,
}

/// Contact details for a vCard 3.0 record. Every field is optional in
/// practice; empty strings serialize as empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCard {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub position: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub phone: String,
    pub message: String,
}

/// A payload kind together with the input shape it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Url(String),
    Text(String),
    Email(String),
    Phone(String),
    Sms(SmsMessage),
    Wifi(WifiCredentials),
    VCard(ContactCard),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Url(_) => PayloadKind::Url,
            Payload::Text(_) => PayloadKind::Text,
            Payload::Email(_) => PayloadKind::Email,
            Payload::Phone(_) => PayloadKind::Phone,
            Payload::Sms(_) => PayloadKind::Sms,
            Payload::Wifi(_) => PayloadKind::Wifi,
            Payload::VCard(_) => PayloadKind::VCard,
        }
    }

    /// The encoded payload, exactly as [`encode`] composes it.
    pub fn encode(&self) -> String {
        encode(self)
    }

    /// The text to feed the rasterizer: the encoded payload, or a single
    /// space when that would be empty.
    pub fn qr_text(&self) -> String {
        non_empty(encode(self))
    }

    /// Human readable history label, already truncated.
    pub fn label(&self) -> String {
        let raw = match self {
            Payload::Url(text)
            | Payload::Text(text)
            | Payload::Email(text)
            | Payload::Phone(text) => text.clone(),
            Payload::Sms(sms) => format!("SMS: {}", sms.phone),
            Payload::Wifi(wifi) => format!("Wi-Fi: {}", wifi.ssid),
            Payload::VCard(card) => format!("Contact: {} {}", card.first_name, card.last_name),
        };
        truncate_label(&raw)
    }
}

/// Composes the scanner-facing text for a payload.
pub fn encode(payload: &Payload) -> String {
    match payload {
        Payload::Url(text) | Payload::Text(text) => text.clone(),
        Payload::Email(address) => format!("mailto:{address}"),
        Payload::Phone(number) => format!("tel:{number}"),
        Payload::Sms(sms) => format!("SMSTO:{}:{}", sms.phone, sms.message),
        Payload::Wifi(wifi) => format!(
            "WIFI:T:{};S:{};P:{};H:{};;",
            wifi.encryption.tag(),
            wifi.ssid,
            wifi.password,
            wifi.hidden
        ),
        Payload::VCard(card) => encode_vcard(card),
    }
}

fn encode_vcard(card: &ContactCard) -> String {
    [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{};{}", card.last_name, card.first_name),
        format!("FN:{} {}", card.first_name, card.last_name),
        format!("ORG:{}", card.organization),
        format!("TITLE:{}", card.position),
        format!("TEL:{}", card.phone),
        format!("EMAIL:{}", card.email),
        format!("URL:{}", card.website),
        format!("ADR:;;{}", card.address),
        "END:VCARD".to_string(),
    ]
    .join("\n")
}

/// Replaces an empty string with [`EMPTY_SUBSTITUTE`].
pub fn non_empty(text: String) -> String {
    if text.is_empty() {
        EMPTY_SUBSTITUTE.to_string()
    } else {
        text
    }
}

/// Cuts a label to [`LABEL_MAX_CHARS`] characters and appends [`ELLIPSIS`]
/// when anything was removed.
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() <= LABEL_MAX_CHARS {
        return label.to_string();
    }
    let mut cut: String = label.chars().take(LABEL_MAX_CHARS).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// A user-supplied field containing a character that the target format
/// treats as a separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterHazard {
    pub field: &'static str,
    pub delimiter: char,
}

const DELIMITERS: [char; 4] = [';', ':', ',', '\n'];

/// Lists the Wi-Fi and vCard fields whose values will be misparsed by a
/// scanner because they carry unescaped delimiters. The encoded output is not
/// affected.
pub fn delimiter_hazards(payload: &Payload) -> Vec<DelimiterHazard> {
    let fields: Vec<(&'static str, &str)> = match payload {
        Payload::Wifi(wifi) => vec![("ssid", wifi.ssid.as_str()), ("password", wifi.password.as_str())],
        Payload::VCard(card) => vec![
            ("firstName", card.first_name.as_str()),
            ("lastName", card.last_name.as_str()),
            ("organization", card.organization.as_str()),
            ("position", card.position.as_str()),
            ("phone", card.phone.as_str()),
            ("email", card.email.as_str()),
            ("website", card.website.as_str()),
            ("address", card.address.as_str()),
        ],
        _ => return Vec::new(),
    };
    let mut hazards = Vec::new();
    for (field, value) in fields {
        for delimiter in DELIMITERS {
            if value.contains(delimiter) {
                hazards.push(DelimiterHazard { field, delimiter });
            }
        }
    }
    hazards
}

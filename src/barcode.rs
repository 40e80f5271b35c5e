// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Barcode detection results and their flattened key/value form.
//!
//! The detector hands over one [`Barcode`] per detected code. [`Flatten`]
//! turns it into a `serde_json::Value` whose key names and nesting are what
//! the consuming side of the plugin boundary expects. Enumerated fields are
//! emitted as the detector's integer codes.

use serde::Deserialize;
use serde_json::{json, Value};

/// Conversion of a detection result (or one of its parts) into the
/// string-keyed mapping sent across the plugin boundary.
pub trait Flatten {
    fn flatten(&self) -> Value;
}

impl<T: Flatten> Flatten for [T] {
    fn flatten(&self) -> Value {
        Value::Array(self.iter().map(Flatten::flatten).collect())
    }
}

impl<T: Flatten> Flatten for Option<T> {
    fn flatten(&self) -> Value {
        self.as_ref().map_or(Value::Null, Flatten::flatten)
    }
}

/// Symbology of a detected barcode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarcodeFormat {
    #[default]
    Unknown,
    #[serde(rename = "CODE_128")]
    Code128,
    #[serde(rename = "CODE_39")]
    Code39,
    #[serde(rename = "CODE_93")]
    Code93,
    Codabar,
    DataMatrix,
    #[serde(rename = "EAN_13")]
    Ean13,
    #[serde(rename = "EAN_8")]
    Ean8,
    Itf,
    QrCode,
    UpcA,
    UpcE,
    Pdf417,
    Aztec,
}

impl BarcodeFormat {
    pub const fn code(self) -> i32 {
        match self {
            BarcodeFormat::Unknown => -1,
            BarcodeFormat::Code128 => 1,
            BarcodeFormat::Code39 => 2,
            BarcodeFormat::Code93 => 4,
            BarcodeFormat::Codabar => 8,
            BarcodeFormat::DataMatrix => 16,
            BarcodeFormat::Ean13 => 32,
            BarcodeFormat::Ean8 => 64,
            BarcodeFormat::Itf => 128,
            BarcodeFormat::QrCode => 256,
            BarcodeFormat::UpcA => 512,
            BarcodeFormat::UpcE => 1024,
            BarcodeFormat::Pdf417 => 2048,
            BarcodeFormat::Aztec => 4096,
        }
    }
}

/// Kind of structured payload carried by a barcode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    #[default]
    Unknown,
    ContactInfo,
    Email,
    Isbn,
    Phone,
    Product,
    Sms,
    Text,
    Url,
    Wifi,
    Geo,
    CalendarEvent,
    DriverLicense,
}

impl ValueType {
    pub const fn code(self) -> i32 {
        match self {
            ValueType::Unknown => 0,
            ValueType::ContactInfo => 1,
            ValueType::Email => 2,
            ValueType::Isbn => 3,
            ValueType::Phone => 4,
            ValueType::Product => 5,
            ValueType::Sms => 6,
            ValueType::Text => 7,
            ValueType::Url => 8,
            ValueType::Wifi => 9,
            ValueType::Geo => 10,
            ValueType::CalendarEvent => 11,
            ValueType::DriverLicense => 12,
        }
    }
}

/// Work/home classification shared by addresses and email addresses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactKind {
    #[default]
    Unknown,
    Work,
    Home,
}

impl ContactKind {
    pub const fn code(self) -> i32 {
        match self {
            ContactKind::Unknown => 0,
            ContactKind::Work => 1,
            ContactKind::Home => 2,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneType {
    #[default]
    Unknown,
    Work,
    Home,
    Fax,
    Mobile,
}

impl PhoneType {
    pub const fn code(self) -> i32 {
        match self {
            PhoneType::Unknown => 0,
            PhoneType::Work => 1,
            PhoneType::Home => 2,
            PhoneType::Fax => 3,
            PhoneType::Mobile => 4,
        }
    }
}

/// WiFi network security.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncryptionType {
    #[default]
    Open,
    Wpa,
    Wep,
}

impl EncryptionType {
    pub const fn code(self) -> i32 {
        match self {
            EncryptionType::Open => 1,
            EncryptionType::Wpa => 2,
            EncryptionType::Wep => 3,
        }
    }
}

/// Corner of the detected code in image coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Flatten for Point {
    fn flatten(&self) -> Value {
        json!({ "x": f64::from(self.x), "y": f64::from(self.y) })
    }
}

/// Date and time of a calendar event; only the raw text is forwarded.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarDateTime {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub is_utc: bool,
    pub raw_value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarEvent {
    pub description: Option<String>,
    pub end: Option<CalendarDateTime>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub start: Option<CalendarDateTime>,
    pub status: Option<String>,
    pub summary: Option<String>,
}

impl Flatten for CalendarEvent {
    fn flatten(&self) -> Value {
        json!({
            "description": self.description,
            "end": self.end.as_ref().and_then(|end| end.raw_value.as_deref()),
            "location": self.location,
            "organizer": self.organizer,
            "start": self.start.as_ref().and_then(|start| start.raw_value.as_deref()),
            "status": self.status,
            "summary": self.summary,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub address_lines: Vec<String>,
    #[serde(rename = "type")]
    pub address_type: ContactKind,
}

impl Flatten for Address {
    fn flatten(&self) -> Value {
        json!({
            "addressLines": self.address_lines,
            "type": self.address_type.code(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonName {
    pub first: Option<String>,
    pub formatted_name: Option<String>,
    pub last: Option<String>,
    pub middle: Option<String>,
    pub prefix: Option<String>,
    pub pronunciation: Option<String>,
    pub suffix: Option<String>,
}

impl Flatten for PersonName {
    fn flatten(&self) -> Value {
        json!({
            "first": self.first,
            "formattedName": self.formatted_name,
            "last": self.last,
            "middle": self.middle,
            "prefix": self.prefix,
            "pronunciation": self.pronunciation,
            "suffix": self.suffix,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Email {
    pub address: Option<String>,
    pub body: Option<String>,
    pub subject: Option<String>,
    #[serde(rename = "type")]
    pub email_type: ContactKind,
}

impl Flatten for Email {
    fn flatten(&self) -> Value {
        json!({
            "address": self.address,
            "body": self.body,
            "subject": self.subject,
            "type": self.email_type.code(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Phone {
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub phone_type: PhoneType,
}

impl Flatten for Phone {
    fn flatten(&self) -> Value {
        json!({ "number": self.number, "type": self.phone_type.code() })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub addresses: Vec<Address>,
    pub emails: Vec<Email>,
    pub name: Option<PersonName>,
    pub organization: Option<String>,
    pub phones: Vec<Phone>,
    pub title: Option<String>,
    pub urls: Vec<String>,
}

impl Flatten for ContactInfo {
    fn flatten(&self) -> Value {
        json!({
            "addresses": self.addresses.flatten(),
            "emails": self.emails.flatten(),
            "name": self.name.flatten(),
            "organization": self.organization,
            "phones": self.phones.flatten(),
            "title": self.title,
            "urls": self.urls,
        })
    }
}

/// Fields decoded from an AAMVA driver license barcode.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverLicense {
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_street: Option<String>,
    pub address_zip: Option<String>,
    pub birth_date: Option<String>,
    pub document_type: Option<String>,
    pub expiry_date: Option<String>,
    pub first_name: Option<String>,
    pub gender: Option<String>,
    pub issue_date: Option<String>,
    pub issuing_country: Option<String>,
    pub last_name: Option<String>,
    pub license_number: Option<String>,
    pub middle_name: Option<String>,
}

impl Flatten for DriverLicense {
    fn flatten(&self) -> Value {
        json!({
            "addressCity": self.address_city,
            "addressState": self.address_state,
            "addressStreet": self.address_street,
            "addressZip": self.address_zip,
            "birthDate": self.birth_date,
            "documentType": self.document_type,
            "expiryDate": self.expiry_date,
            "firstName": self.first_name,
            "gender": self.gender,
            "issueDate": self.issue_date,
            "issuingCountry": self.issuing_country,
            "lastName": self.last_name,
            "licenseNumber": self.license_number,
            "middleName": self.middle_name,
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl Flatten for GeoPoint {
    fn flatten(&self) -> Value {
        json!({ "latitude": self.lat, "longitude": self.lng })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sms {
    pub message: Option<String>,
    pub phone_number: Option<String>,
}

impl Flatten for Sms {
    fn flatten(&self) -> Value {
        json!({ "message": self.message, "phoneNumber": self.phone_number })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UrlBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
}

impl Flatten for UrlBookmark {
    fn flatten(&self) -> Value {
        json!({ "title": self.title, "url": self.url })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WiFi {
    pub encryption_type: EncryptionType,
    pub password: Option<String>,
    pub ssid: Option<String>,
}

impl Flatten for WiFi {
    fn flatten(&self) -> Value {
        json!({
            "encryptionType": self.encryption_type.code(),
            "password": self.password,
            "ssid": self.ssid,
        })
    }
}

/// A single detected barcode.
///
/// At most one of the structured payloads is normally present, matching
/// `value_type`, but nothing here depends on that.
///
/// # Example
///
/// ```
/// use scanner_bridge::barcode::{Barcode, BarcodeFormat, Flatten};
///
/// let barcode = Barcode {
///     format: BarcodeFormat::QrCode,
///     raw_value: Some(" https://example.com ".to_string()),
///     ..Default::default()
/// };
/// let data = barcode.flatten();
///
/// assert_eq!(data["format"], 256);
/// assert_eq!(data["rawValue"], "https://example.com");
/// assert!(data["wifi"].is_null());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Barcode {
    pub corner_points: Option<Vec<Point>>,
    pub format: BarcodeFormat,
    pub raw_bytes: Option<Vec<u8>>,
    pub raw_value: Option<String>,
    pub value_type: ValueType,
    pub calendar_event: Option<CalendarEvent>,
    pub contact_info: Option<ContactInfo>,
    pub driver_license: Option<DriverLicense>,
    pub email: Option<Email>,
    pub geo_point: Option<GeoPoint>,
    pub phone: Option<Phone>,
    pub sms: Option<Sms>,
    pub url: Option<UrlBookmark>,
    pub wifi: Option<WiFi>,
    pub display_value: Option<String>,
}

impl Flatten for Barcode {
    fn flatten(&self) -> Value {
        json!({
            "corners": self.corner_points.as_deref().map(Flatten::flatten),
            "format": self.format.code(),
            "rawBytes": self.raw_bytes,
            "rawValue": self.raw_value.as_deref().map(str::trim),
            "type": self.value_type.code(),
            "calendarEvent": self.calendar_event.flatten(),
            "contactInfo": self.contact_info.flatten(),
            "driverLicense": self.driver_license.flatten(),
            "email": self.email.flatten(),
            "geoPoint": self.geo_point.flatten(),
            "phone": self.phone.flatten(),
            "sms": self.sms.flatten(),
            "url": self.url.flatten(),
            "wifi": self.wifi.flatten(),
            "displayValue": self.display_value,
        })
    }
}

impl From<&Barcode> for Value {
    fn from(barcode: &Barcode) -> Self {
        barcode.flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_points_are_floating_point() {
        let data = Point { x: 3, y: -4 }.flatten();
        assert!(data["x"].is_f64());
        assert_eq!(data["x"], 3.0);
        assert_eq!(data["y"], -4.0);
    }

    #[test]
    fn calendar_event_forwards_raw_dates() {
        let event = CalendarEvent {
            summary: Some("Standup".to_string()),
            start: Some(CalendarDateTime {
                year: 2025,
                raw_value: Some("20250102T090000".to_string()),
                ..Default::default()
            }),
            end: Some(CalendarDateTime::default()),
            ..Default::default()
        };
        let data = event.flatten();

        assert_eq!(data["start"], "20250102T090000");
        assert!(data["end"].is_null());
        assert_eq!(data["summary"], "Standup");
        assert!(data["description"].is_null());
    }

    #[test]
    fn enum_codes() {
        assert_eq!(BarcodeFormat::Unknown.code(), -1);
        assert_eq!(BarcodeFormat::Aztec.code(), 4096);
        assert_eq!(ValueType::DriverLicense.code(), 12);
        assert_eq!(PhoneType::Mobile.code(), 4);
        assert_eq!(EncryptionType::Wep.code(), 3);
    }

    #[test]
    fn names_deserialize_from_detector_spelling() {
        let format: BarcodeFormat = serde_json::from_str("\"CODE_128\"").unwrap();
        assert_eq!(format, BarcodeFormat::Code128);
        let format: BarcodeFormat = serde_json::from_str("\"UPC_A\"").unwrap();
        assert_eq!(format, BarcodeFormat::UpcA);
        let value_type: ValueType = serde_json::from_str("\"CALENDAR_EVENT\"").unwrap();
        assert_eq!(value_type, ValueType::CalendarEvent);
    }
}

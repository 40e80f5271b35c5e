// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use scanner_bridge::{
    barcode::{
        Address, Barcode, BarcodeFormat, ContactInfo, ContactKind, EncryptionType, Flatten,
        GeoPoint, PersonName, Phone, PhoneType, Point, ValueType, WiFi,
    },
    flatten_barcodes,
};
use serde_json::{json, Value};
use std::error::Error;

const TOP_LEVEL_KEYS: [&str; 15] = [
    "corners",
    "format",
    "rawBytes",
    "rawValue",
    "type",
    "calendarEvent",
    "contactInfo",
    "driverLicense",
    "email",
    "geoPoint",
    "phone",
    "sms",
    "url",
    "wifi",
    "displayValue",
];

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("flattened value should be a mapping")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn test_empty_result() {
    let data = Barcode::default().flatten();

    assert_eq!(keys(&data), TOP_LEVEL_KEYS);
    for key in TOP_LEVEL_KEYS {
        match key {
            "format" => assert_eq!(data[key], -1),
            "type" => assert_eq!(data[key], 0),
            _ => assert!(data[key].is_null(), "{key} should be null"),
        }
    }
}

#[test]
fn test_raw_value_trimmed() {
    let barcode = Barcode {
        raw_value: Some("  hello \n".to_string()),
        display_value: Some("  hello \n".to_string()),
        ..Default::default()
    };
    let data = barcode.flatten();

    assert_eq!(data["rawValue"], "hello");
    assert_eq!(data["displayValue"], "  hello \n");
}

#[test]
fn test_scalars() {
    let barcode = Barcode {
        corner_points: Some(vec![
            Point { x: 1, y: 2 },
            Point { x: 3, y: 4 },
            Point { x: 5, y: 6 },
            Point { x: 7, y: 8 },
        ]),
        format: BarcodeFormat::QrCode,
        raw_bytes: Some(vec![0x68, 0x69]),
        raw_value: Some("hi".to_string()),
        value_type: ValueType::Text,
        ..Default::default()
    };
    let data = barcode.flatten();

    assert_eq!(data["format"], 256);
    assert_eq!(data["type"], 7);
    assert_eq!(data["rawBytes"], json!([104, 105]));
    assert_eq!(data["corners"].as_array().map(Vec::len), Some(4));
    assert_eq!(data["corners"][3], json!({ "x": 7.0, "y": 8.0 }));
}

#[test]
fn test_contact_info() {
    let barcode = Barcode {
        value_type: ValueType::ContactInfo,
        contact_info: Some(ContactInfo {
            addresses: vec![
                Address {
                    address_lines: vec!["1 Main St".to_string(), "Springfield".to_string()],
                    address_type: ContactKind::Home,
                },
                Address {
                    address_lines: vec!["2 Work Rd".to_string()],
                    address_type: ContactKind::Work,
                },
            ],
            phones: vec![Phone {
                number: Some("+1 555 0100".to_string()),
                phone_type: PhoneType::Mobile,
            }],
            name: Some(PersonName {
                first: Some("Ada".to_string()),
                last: Some("Lovelace".to_string()),
                ..Default::default()
            }),
            urls: vec!["https://example.com".to_string()],
            ..Default::default()
        }),
        ..Default::default()
    };
    let data = barcode.flatten();
    let contact = &data["contactInfo"];

    assert_eq!(
        keys(contact),
        ["addresses", "emails", "name", "organization", "phones", "title", "urls"]
    );
    assert_eq!(contact["addresses"].as_array().map(Vec::len), Some(2));
    assert_eq!(contact["phones"].as_array().map(Vec::len), Some(1));
    assert_eq!(contact["emails"], json!([]));
    assert_eq!(
        contact["addresses"][0],
        json!({ "addressLines": ["1 Main St", "Springfield"], "type": 2 })
    );
    assert_eq!(
        contact["addresses"][1],
        json!({ "addressLines": ["2 Work Rd"], "type": 1 })
    );
    assert_eq!(
        contact["phones"][0],
        json!({ "number": "+1 555 0100", "type": 4 })
    );
    assert_eq!(contact["name"]["first"], "Ada");
    assert_eq!(contact["name"]["last"], "Lovelace");
    assert!(contact["name"]["formattedName"].is_null());
    assert!(contact["organization"].is_null());
    assert_eq!(contact["urls"], json!(["https://example.com"]));
}

#[test]
fn test_wifi_and_geo() {
    let barcode = Barcode {
        wifi: Some(WiFi {
            encryption_type: EncryptionType::Wpa,
            password: Some("hunter2".to_string()),
            ssid: Some("lab".to_string()),
        }),
        geo_point: Some(GeoPoint {
            lat: 52.37,
            lng: 4.89,
        }),
        ..Default::default()
    };
    let data = barcode.flatten();

    assert_eq!(
        data["wifi"],
        json!({ "encryptionType": 2, "password": "hunter2", "ssid": "lab" })
    );
    assert_eq!(keys(&data["geoPoint"]), ["latitude", "longitude"]);
    assert_eq!(data["geoPoint"]["latitude"], 52.37);
    assert_eq!(data["geoPoint"]["longitude"], 4.89);
}

#[test]
fn test_deserialize_and_flatten() -> Result<(), Box<dyn Error>> {
    let barcode: Barcode = serde_json::from_value(json!({
        "format": "EAN_13",
        "valueType": "PRODUCT",
        "rawValue": "4006381333931",
        "cornerPoints": [{ "x": 0, "y": 0 }, { "x": 10, "y": 0 }],
        "driverLicense": { "firstName": "Jane", "licenseNumber": "D123" },
        "email": { "address": "a@b.c", "type": "WORK" },
        "sms": { "message": "hi", "phoneNumber": "123" },
        "url": { "title": "Example", "url": "https://example.com" },
        "calendarEvent": { "summary": "Launch", "start": { "rawValue": "20250101" } }
    }))?;
    let data = barcode.flatten();

    assert_eq!(data["format"], 32);
    assert_eq!(data["type"], 5);
    assert_eq!(data["corners"][1]["x"], 10.0);
    assert_eq!(data["driverLicense"]["firstName"], "Jane");
    assert_eq!(data["driverLicense"]["licenseNumber"], "D123");
    assert!(data["driverLicense"]["gender"].is_null());
    assert_eq!(
        keys(&data["driverLicense"]),
        [
            "addressCity",
            "addressState",
            "addressStreet",
            "addressZip",
            "birthDate",
            "documentType",
            "expiryDate",
            "firstName",
            "gender",
            "issueDate",
            "issuingCountry",
            "lastName",
            "licenseNumber",
            "middleName",
        ]
    );
    assert_eq!(
        data["email"],
        json!({ "address": "a@b.c", "body": null, "subject": null, "type": 1 })
    );
    assert_eq!(data["sms"], json!({ "message": "hi", "phoneNumber": "123" }));
    assert_eq!(
        data["url"],
        json!({ "title": "Example", "url": "https://example.com" })
    );
    assert_eq!(data["calendarEvent"]["start"], "20250101");
    assert!(data["calendarEvent"]["end"].is_null());
    assert!(data["contactInfo"].is_null());

    Ok(())
}

#[test]
fn test_flatten_list() {
    let barcodes = [
        Barcode {
            format: BarcodeFormat::Aztec,
            ..Default::default()
        },
        Barcode::default(),
    ];
    let data = flatten_barcodes(&barcodes);

    assert_eq!(data.as_array().map(Vec::len), Some(2));
    assert_eq!(data[0]["format"], 4096);
    assert_eq!(data[1], Value::from(&barcodes[1]));
}

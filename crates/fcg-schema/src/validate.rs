// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Range and content constraints of a typed document.
//!
//! Sections are checked in declaration order (mqtt, cameras, audio,
//! network) and every violation is collected. Absent optional fields are
//! always valid, whatever the state of related fields. Free-form strings
//! (hosts, detector types, labels, stream URLs, mask polygons) are not
//! checked; zone coordinates only have to be non-empty.

use crate::{FieldError, ValidationErrors};
use fcg_config_types::{
    AudioConfig, CameraEntry, ConfigDocument, DetectConfig, MqttConfig, NetworkConfig,
    RecordConfig, SnapshotsConfig, Zone,
};
use std::net::IpAddr;

/// Validate a whole document.
pub fn validate(doc: &ConfigDocument) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();
    if let Some(mqtt) = &doc.mqtt {
        c.at("mqtt", |c| check_mqtt(c, mqtt));
    }
    c.at("cameras", |c| {
        for (name, camera) in doc.cameras.iter() {
            c.at(name, |c| check_camera(c, camera));
        }
    });
    if let Some(audio) = &doc.audio {
        c.at("audio", |c| check_audio(c, audio));
    }
    if let Some(network) = &doc.network {
        c.at("network", |c| check_network(c, network));
    }
    c.finish()
}

/// Validate a single camera; paths are reported relative to the camera.
pub fn validate_camera(camera: &CameraEntry) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();
    check_camera(&mut c, camera);
    c.finish()
}

#[derive(Default)]
struct Collector {
    path: Vec<String>,
    errors: Vec<FieldError>,
}

impl Collector {
    fn at(&mut self, segment: impl ToString, f: impl FnOnce(&mut Self)) {
        self.path.push(segment.to_string());
        f(self);
        self.path.pop();
    }

    fn fail(&mut self, field: &str, reason: impl Into<String>) {
        let mut path = self.path.join(".");
        if !field.is_empty() {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(field);
        }
        self.errors.push(FieldError::new(path, reason));
    }

    fn non_negative_int(&mut self, field: &str, value: Option<i64>) {
        if let Some(v) = value {
            if v < 0 {
                self.fail(field, format!("must be a non-negative integer (got {v})"));
            }
        }
    }

    fn non_negative_number(&mut self, field: &str, value: Option<f64>) {
        if let Some(v) = value {
            if !(v.is_finite() && v >= 0.0) {
                self.fail(field, format!("must be a non-negative number (got {v})"));
            }
        }
    }

    fn positive_int(&mut self, field: &str, value: Option<i64>) {
        if let Some(v) = value {
            if v <= 0 {
                self.fail(field, format!("must be greater than 0 (got {v})"));
            }
        }
    }

    fn int_in_range(&mut self, field: &str, value: Option<i64>, min: i64, max: i64) {
        if let Some(v) = value {
            if !(min..=max).contains(&v) {
                self.fail(field, format!("must be between {min} and {max} (got {v})"));
            }
        }
    }

    fn non_empty(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.fail(field, "must not be empty");
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

fn check_mqtt(c: &mut Collector, mqtt: &MqttConfig) {
    c.int_in_range("port", mqtt.port, 1, 65535);
}

fn check_camera(c: &mut Collector, camera: &CameraEntry) {
    c.at("ffmpeg", |c| {
        if camera.ffmpeg.inputs.is_empty() {
            c.fail("inputs", "at least one input is required");
        }
        c.at("inputs", |c| {
            for (i, input) in camera.ffmpeg.inputs.iter().enumerate() {
                if input.roles.is_empty() {
                    c.at(i, |c| c.fail("roles", "at least one role is required"));
                }
            }
        });
    });

    if let Some(detect) = &camera.detect {
        c.at("detect", |c| check_detect(c, detect));
    }

    c.at("zones", |c| {
        for (name, zone) in camera.zones.iter() {
            c.at(name, |c| check_zone(c, zone));
        }
    });

    if let Some(record) = &camera.record {
        c.at("record", |c| check_record(c, record));
    }

    if let Some(snapshots) = &camera.snapshots {
        c.at("snapshots", |c| check_snapshots(c, snapshots));
    }
}

fn check_detect(c: &mut Collector, detect: &DetectConfig) {
    c.positive_int("width", detect.width);
    c.positive_int("height", detect.height);
    c.positive_int("fps", detect.fps);
}

fn check_zone(c: &mut Collector, zone: &Zone) {
    c.non_empty("coordinates", &zone.coordinates);
    c.non_negative_int("inertia", zone.inertia);
    c.non_negative_number("loitering_time", zone.loitering_time);
}

fn check_record(c: &mut Collector, record: &RecordConfig) {
    if let Some(retain) = &record.retain {
        c.at("retain", |c| c.non_negative_int("days", retain.days));
    }
    if let Some(events) = &record.events {
        c.at("events", |c| {
            c.non_negative_int("pre_capture", events.pre_capture);
            c.non_negative_int("post_capture", events.post_capture);
        });
    }
}

fn check_snapshots(c: &mut Collector, snapshots: &SnapshotsConfig) {
    c.int_in_range("quality", snapshots.quality, 1, 100);
}

fn check_audio(c: &mut Collector, audio: &AudioConfig) {
    if let Some(threshold) = audio.threshold {
        if !threshold.is_finite() {
            c.fail("threshold", "must be a finite number");
        }
    }
    c.non_negative_number("duration", audio.duration);
}

fn check_network(c: &mut Collector, network: &NetworkConfig) {
    let Some(proxies) = network.proxy.as_ref().and_then(|p| p.trusted_proxies.as_ref()) else {
        return;
    };
    c.at("proxy", |c| {
        c.at("trusted_proxies", |c| {
            for (i, entry) in proxies.iter().enumerate() {
                if let Err(reason) = check_ip_or_cidr(entry) {
                    c.fail(&i.to_string(), reason);
                }
            }
        });
    });
}

/// Accept `10.0.0.1`, `10.0.0.0/8`, `fd00::/8` and similar.
fn check_ip_or_cidr(entry: &str) -> Result<(), String> {
    let (addr, prefix) = match entry.trim().split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (entry.trim(), None),
    };
    let ip: IpAddr = addr
        .parse()
        .map_err(|_| format!("'{}' is not an IP address or CIDR block", entry))?;
    if let Some(prefix) = prefix {
        let max = if ip.is_ipv4() { 32 } else { 128 };
        let bits: u8 = prefix
            .parse()
            .map_err(|_| format!("invalid prefix length '{}' in '{}'", prefix, entry))?;
        if bits > max {
            return Err(format!("prefix length {} exceeds {} in '{}'", bits, max, entry));
        }
    }
    Ok(())
}

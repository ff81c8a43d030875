// SmartOLT API response and request types
//
// The service is loose about JSON types: ids and port counts arrive as
// strings on some accounts and numbers on others, and optional fields are
// sometimes absent and sometimes null. Fields use `#[serde(default)]` and the
// helpers in `de` to absorb that.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::transport::FormBody;

// ── Envelopes ────────────────────────────────────────────────────────

/// Envelope used by most list endpoints:
/// ```json
/// { "status": true, "response_code": null, "response": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub response_code: Option<String>,
    pub response: Vec<T>,
}

/// Envelope of `GET /onu/get_all_onus_details`, which uses `onus`
/// instead of `response`.
#[derive(Debug, Deserialize)]
pub struct OnuListResponse {
    #[serde(default)]
    pub status: bool,
    pub onus: Vec<OnuListItem>,
}

/// Body of a non-2xx response when the service reports a reason.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

// ── ONU ──────────────────────────────────────────────────────────────

/// Full ONU record from `GET /onu/get_onu_details/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnuDetails {
    #[serde(rename = "unique_external_id", deserialize_with = "de::string_or_number")]
    pub external_id: String,
    pub sn: String,
    pub name: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub olt_id: String,
    pub olt_name: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub board: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub port: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub onu: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub onu_type_id: String,
    pub onu_type_name: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub zone_id: String,
    pub zone_name: String,
    pub address: Option<String>,
    pub odb_name: String,
    pub mode: String,
    pub wan_mode: String,
    pub ip_address: Option<String>,
    pub subnet_mask: Option<String>,
    pub default_gateway: Option<String>,
    pub dns1: Option<String>,
    pub dns2: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub catv: Option<String>,
    pub administrative_status: String,
    pub service_ports: Vec<ServicePort>,
}

/// A service port (VLAN mapping + rate limit) attached to an ONU.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePort {
    #[serde(rename = "service_port", deserialize_with = "de::string_or_number")]
    pub port: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub vlan: String,
    #[serde(rename = "c_vlan", deserialize_with = "de::string_or_number")]
    pub cvlan: String,
    #[serde(rename = "s_vlan", deserialize_with = "de::string_or_number")]
    pub svlan: String,
    pub tag_transform_mode: String,
    pub upload_speed: String,
    pub download_speed: String,
}

/// Optical signal levels from `GET /onu/get_onu_signal/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnuSignal {
    pub status: bool,
    pub onu_signal: String,
    pub onu_signal_value: String,
    pub onu_signal_1310: String,
    pub onu_signal_1490: String,
}

/// Lightweight entry from `GET /onu/get_all_onus_details`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnuListItem {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub unique_external_id: String,
    /// Name of the distribution box the ONU hangs off. Matched against
    /// [`Odb::name`] case-insensitively after trimming.
    #[serde(default, deserialize_with = "de::string_or_null")]
    pub odb_name: String,
}

/// Entry of `GET /onu/get_onu_statuses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnuStatus {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "de::string_or_null")]
    pub sn: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub olt_id: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub board: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub port: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub onu: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub zone_id: String,
    /// `"Online"`, `"Offline"`, `"LOS"`, `"Power fail"`, ...
    #[serde(deserialize_with = "de::string_or_null")]
    pub status: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC. Empty when the service sends `null`.
    #[serde(deserialize_with = "de::string_or_null")]
    pub last_status_change: String,
}

/// ONU seen by an OLT but not yet authorized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnconfiguredOnu {
    pub pon_type: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub board: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub port: String,
    pub pon_description: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub onu: String,
    pub sn: String,
    pub onu_type_name: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub onu_type_id: String,
}

// ── System ───────────────────────────────────────────────────────────

/// Named upload or download rate-limit policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedProfile {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    pub name: String,
    pub speed: String,
    pub direction: String,
    #[serde(rename = "type")]
    pub profile_type: String,
}

/// Optical distribution box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Odb {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "de::string_or_null")]
    pub name: String,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub zone_id: String,
    /// Port capacity. Sent as a JSON string by the service.
    #[serde(deserialize_with = "de::int_from_string_or_number")]
    pub ports: i64,
}

/// Port usage summary for one distribution box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OdbAvailability {
    pub odb_id: String,
    pub odb_name: String,
    pub total_ports: i64,
    pub used_ports: i64,
    /// `total_ports - used_ports`; negative when the box is over-provisioned.
    pub available_ports: i64,
}

// ── Authorization ────────────────────────────────────────────────────

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("unknown ", stringify!($name), " '{}'"),
                        other
                    )),
                }
            }
        }
    };
}

wire_enum! {
    /// PON technology of the port the ONU is attached to.
    PonType { Gpon => "gpon", Epon => "epon" }
}

wire_enum! {
    /// GPON channel used for the authorization.
    GponChannel { Gpon => "gpon", XgPon => "xg-pon", XgsPon => "xgs-pon" }
}

wire_enum! {
    /// WAN mode the ONU is provisioned in.
    OnuMode { Routing => "routing", Bridging => "bridging" }
}

/// Form for `POST /onu/authorize_onu`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeOnu {
    pub olt_id: String,
    pub pon_type: PonType,
    pub gpon_channel: GponChannel,
    pub board: String,
    pub port: String,
    pub sn: String,
    pub vlan: String,
    pub onu_type: String,
    pub zone: String,
    pub odb: Option<String>,
    pub name: String,
    pub address_or_comment: Option<String>,
    pub onu_mode: OnuMode,
    pub onu_external_id: String,
}

impl AuthorizeOnu {
    /// Encode as the named form fields the endpoint expects.
    pub fn to_form(&self) -> FormBody {
        FormBody::new()
            .field("olt_id", &self.olt_id)
            .field("pon_type", self.pon_type.as_str())
            .field("gpon_channel", self.gpon_channel.as_str())
            .field("board", &self.board)
            .field("port", &self.port)
            .field("sn", &self.sn)
            .field("vlan", &self.vlan)
            .field("onu_type", &self.onu_type)
            .field("zone", &self.zone)
            .optional_field("odb", self.odb.as_deref())
            .field("name", &self.name)
            .optional_field("address_or_comment", self.address_or_comment.as_deref())
            .field("onu_mode", self.onu_mode.as_str())
            .field("onu_external_id", &self.onu_external_id)
    }
}

// ── Lenient deserializers ────────────────────────────────────────────

mod de {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Num(serde_json::Number),
        Bool(bool),
    }

    /// Accept `"12"`, `12`, or `null` (as empty) for a string field.
    pub fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Option::<Scalar>::deserialize(d)? {
            Some(Scalar::Str(s)) => s,
            Some(Scalar::Num(n)) => n.to_string(),
            Some(Scalar::Bool(b)) => b.to_string(),
            None => String::new(),
        })
    }

    /// Accept a string or `null` (as empty).
    pub fn string_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }

    /// Accept `"8"` or `8` for an integer field.
    pub fn int_from_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match Scalar::deserialize(d)? {
            Scalar::Str(s) => s
                .trim()
                .parse()
                .map_err(|e| D::Error::custom(format!("invalid integer {s:?}: {e}"))),
            Scalar::Num(n) => n
                .as_i64()
                .ok_or_else(|| D::Error::custom(format!("integer out of range: {n}"))),
            Scalar::Bool(b) => Err(D::Error::custom(format!("expected integer, got {b}"))),
        }
    }
}

use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Number;

pub const MIN_CPU_COUNT: i64 = 1;
pub const MAX_CPU_COUNT: i64 = 64;
pub const MIN_MEM_SIZE_GB: i64 = 8;
pub const MAX_MEM_SIZE_GB: i64 = 1024;

/// OS images a VM can be started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VmImage {
    #[serde(rename = "ubuntu-24.04")]
    Ubuntu,
    #[serde(rename = "debian:bookworm")]
    Debian,
    #[serde(rename = "alpine:3.20")]
    Alpine,
}

impl VmImage {
    pub const ALL: [VmImage; 3] = [VmImage::Ubuntu, VmImage::Debian, VmImage::Alpine];

    pub fn as_str(&self) -> &'static str {
        match self {
            VmImage::Ubuntu => "ubuntu-24.04",
            VmImage::Debian => "debian:bookworm",
            VmImage::Alpine => "alpine:3.20",
        }
    }
}

impl fmt::Display for VmImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VmImage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VmImage::ALL
            .into_iter()
            .find(|image| image.as_str() == s)
            .ok_or(())
    }
}

/// A start request as received from a client. Nothing here has been checked yet.
///
/// The numeric fields accept any JSON number so that fractions and huge values
/// are reported per field instead of failing the whole body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmSpecRequest {
    pub cpu_count: Number,
    pub mem_size_gb: Number,
    pub image: String,
}

/// A specification that passed validation. Only these end up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmSpec {
    pub cpu_count: u8,
    pub mem_size_gb: u16,
    pub image: VmImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn integer_in_range(
    field: &'static str,
    value: &Number,
    range: RangeInclusive<i64>,
    expected: &str,
) -> Result<i64, FieldViolation> {
    match value.as_i64() {
        Some(n) if range.contains(&n) => Ok(n),
        Some(n) => Err(FieldViolation {
            field,
            message: format!("must be {}, got {}", expected, n),
        }),
        None => Err(FieldViolation {
            field,
            message: format!("must be an integer, got {}", value),
        }),
    }
}

impl VmSpecRequest {
    /// Checks every field and reports all of the ones that failed, not only the first.
    pub fn validate(&self) -> Result<VmSpec, Vec<FieldViolation>> {
        let mut violations = vec![];

        let cpu_count = integer_in_range(
            "cpu_count",
            &self.cpu_count,
            MIN_CPU_COUNT..=MAX_CPU_COUNT,
            "greater than 0 and less than 65",
        )
        .and_then(|n| {
            u8::try_from(n).map_err(|_| FieldViolation {
                field: "cpu_count",
                message: format!("out of range, got {}", n),
            })
        })
        .map_err(|v| violations.push(v))
        .ok();

        let mem_size_gb = integer_in_range(
            "mem_size_gb",
            &self.mem_size_gb,
            MIN_MEM_SIZE_GB..=MAX_MEM_SIZE_GB,
            "greater than or equal to 8 and less than 1025",
        )
        .and_then(|n| {
            u16::try_from(n).map_err(|_| FieldViolation {
                field: "mem_size_gb",
                message: format!("out of range, got {}", n),
            })
        })
        .map_err(|v| violations.push(v))
        .ok();

        let image = match self.image.parse::<VmImage>() {
            Ok(image) => Some(image),
            Err(()) => {
                let supported = VmImage::ALL
                    .iter()
                    .map(|i| format!("'{}'", i))
                    .collect::<Vec<_>>()
                    .join(", ");

                violations.push(FieldViolation {
                    field: "image",
                    message: format!(
                        "unsupported image '{}', expected one of {}",
                        self.image, supported
                    ),
                });
                None
            }
        };

        match (cpu_count, mem_size_gb, image) {
            (Some(cpu_count), Some(mem_size_gb), Some(image)) => Ok(VmSpec {
                cpu_count,
                mem_size_gb,
                image,
            }),
            _ => Err(violations),
        }
    }
}

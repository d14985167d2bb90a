pub mod spec;

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    registry::spec::{FieldViolation, VmSpec, VmSpecRequest},
    utils::id::IdGenerator,
};

const MAX_ID_ATTEMPTS: usize = 16;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid vm specification: {}", format_violations(.0))]
    InvalidSpecification(Vec<FieldViolation>),
    #[error("vm {0} not found")]
    NotFound(String),
    #[error("no free vm id after {} attempts", MAX_ID_ATTEMPTS)]
    IdSpaceExhausted,
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmRecord {
    pub id: String,
    pub spec: VmSpec,
}

/// In-memory bookkeeping of started VMs, keyed by opaque id.
///
/// The lock only ever covers the map mutation itself. Id generation and
/// validation happen before it is taken.
pub struct Registry {
    id_generator: Arc<dyn IdGenerator>,
    vms: Mutex<HashMap<String, VmSpec>>,
}

impl Registry {
    pub fn new(id_generator: Arc<dyn IdGenerator>) -> Self {
        Self {
            id_generator,
            vms: Mutex::new(HashMap::new()),
        }
    }

    fn vms(&self) -> MutexGuard<'_, HashMap<String, VmSpec>> {
        // the map only holds plain data, a panic elsewhere can't leave it half-written
        self.vms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self, request: &VmSpecRequest) -> Result<String, RegistryError> {
        let spec = request.validate().map_err(|violations| {
            warn!("rejected vm spec: {}", format_violations(&violations));
            RegistryError::InvalidSpecification(violations)
        })?;

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.id_generator.generate();

            let size = {
                let mut vms = self.vms();
                match vms.entry(id.clone()) {
                    Entry::Occupied(_) => None,
                    Entry::Vacant(entry) => {
                        entry.insert(spec);
                        Some(vms.len())
                    }
                }
            };

            let Some(size) = size else {
                debug!("vm id {} already taken, generating another", id);
                continue;
            };

            info!(
                "started vm {} ({} cpu, {} GB, {}), {} vms registered",
                id, spec.cpu_count, spec.mem_size_gb, spec.image, size
            );
            return Ok(id);
        }

        Err(RegistryError::IdSpaceExhausted)
    }

    pub fn stop(&self, id: impl AsRef<str>) -> Result<VmRecord, RegistryError> {
        let id = id.as_ref();

        let (spec, size) = {
            let mut vms = self.vms();
            let spec = vms.remove(id);
            (spec, vms.len())
        };

        let Some(spec) = spec else {
            return Err(RegistryError::NotFound(id.to_string()));
        };

        info!("stopped vm {}, {} vms registered", id, size);

        Ok(VmRecord {
            id: id.to_string(),
            spec,
        })
    }

    pub fn len(&self) -> usize {
        self.vms().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Static payload returned by the root route.
#[derive(Serialize, Debug)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

impl ServiceInfo {
    pub fn new(service: &'static str, version: &'static str) -> Self {
        Self { service, status: "ok", version }
    }
}

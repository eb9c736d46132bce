// ABOUTME: Runtime detection for the local system.
// ABOUTME: Honours explicit config and DOCKER_HOST, then probes Docker and Podman sockets.

use super::types::{RuntimeConfig, RuntimeInfo, RuntimeType};
use std::path::Path;

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked Docker and Podman sockets)")]
    NoRuntimeFound,

    #[error("unsupported DOCKER_HOST '{0}' (only unix:// sockets are supported)")]
    UnsupportedHost(String),
}

const DOCKER_SOCKET: &str = "/var/run/docker.sock";
const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

/// Work out which runtime to talk to and where its socket lives.
///
/// Resolution order:
/// 1. Explicit `runtime`/`socket` in `config`
/// 2. `DOCKER_HOST` (unix sockets only)
/// 3. Docker socket (`/var/run/docker.sock`)
/// 4. Rootful Podman socket (`/run/podman/podman.sock`)
/// 5. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
pub fn detect_runtime(config: &RuntimeConfig) -> Result<RuntimeInfo, DetectionError> {
    if let Some(runtime_type) = config.runtime {
        let socket_path = config
            .socket
            .clone()
            .unwrap_or_else(|| default_socket_path(runtime_type));
        return Ok(RuntimeInfo {
            runtime_type,
            socket_path,
        });
    }

    if let Some(socket) = &config.socket {
        return Ok(RuntimeInfo {
            runtime_type: guess_runtime_type(socket),
            socket_path: socket.clone(),
        });
    }

    if let Ok(host) = std::env::var(DOCKER_HOST_ENV)
        && !host.trim().is_empty()
    {
        let socket_path = host
            .strip_prefix("unix://")
            .ok_or_else(|| DetectionError::UnsupportedHost(host.clone()))?;
        return Ok(RuntimeInfo {
            runtime_type: guess_runtime_type(socket_path),
            socket_path: socket_path.to_string(),
        });
    }

    detect_local()
}

/// Probe the well-known socket locations on this machine.
pub fn detect_local() -> Result<RuntimeInfo, DetectionError> {
    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Docker,
            socket_path: DOCKER_SOCKET.to_string(),
        });
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Podman,
            socket_path: ROOTFUL_PODMAN.to_string(),
        });
    }

    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless_socket).exists() {
            return Ok(RuntimeInfo {
                runtime_type: RuntimeType::Podman,
                socket_path: rootless_socket,
            });
        }
    }

    Err(DetectionError::NoRuntimeFound)
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn guess_runtime_type(socket_path: &str) -> RuntimeType {
    if socket_path.contains("podman") {
        RuntimeType::Podman
    } else {
        RuntimeType::Docker
    }
}

fn default_socket_path(runtime: RuntimeType) -> String {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET.to_string(),
        RuntimeType::Podman => ROOTFUL_PODMAN.to_string(),
    }
}

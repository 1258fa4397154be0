//! System status adapter: one-line CPU/memory/disk summary

use async_trait::async_trait;
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};

use super::{FailureKind, Tool, ToolDescriptor, ToolReply};

/// System status adapter exposed to the session as `get_system_status`
#[derive(Default)]
pub struct SystemStatusTool;

/// Snapshot of host utilization percentages
#[derive(Debug, Clone, Copy)]
struct Utilization {
    cpu: f64,
    memory: f64,
    disk: f64,
}

impl SystemStatusTool {
    /// Create the adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Sample the host. CPU usage needs two refreshes separated by the
    /// minimum sampling interval.
    async fn sample() -> Option<Utilization> {
        let mut sys = System::new_all();

        sys.refresh_cpu_usage();
        tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
        sys.refresh_cpu_usage();

        let total_memory = sys.total_memory();
        if total_memory == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let memory = sys.used_memory() as f64 / total_memory as f64 * 100.0;

        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"))
            .or_else(|| disks.list().first())?;

        let total_disk = disk.total_space();
        if total_disk == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let disk_used =
            (total_disk - disk.available_space()) as f64 / total_disk as f64 * 100.0;

        Some(Utilization {
            cpu: f64::from(sys.global_cpu_usage()),
            memory,
            disk: disk_used,
        })
    }
}

#[async_trait]
impl Tool for SystemStatusTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_system_status",
            description: "Get system health information for the host",
            parameters: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn invoke(&self, _args: serde_json::Value) -> ToolReply {
        match Self::sample().await {
            Some(u) => {
                let (cpu, memory, disk) = (u.cpu, u.memory, u.disk);
                ToolReply::Success(format!(
                    "System Status: CPU {cpu:.1}%, Memory {memory:.1}% used, Disk {disk:.1}% used"
                ))
            }
            None => {
                tracing::error!("host metrics unavailable");
                ToolReply::failure(FailureKind::Unavailable, "System status unavailable")
            }
        }
    }
}

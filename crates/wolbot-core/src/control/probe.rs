// ── ICMP liveness probe ──
//
// Delegates to the system `ping` so the daemon needs no raw-socket
// privileges. One echo request, bounded by `-W` and by a hard deadline
// on the child process. `-W` is seconds for Linux iputils and busybox,
// milliseconds for the BSD family (macOS included).

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use super::ProbeResult;

/// Slack on top of the probe timeout before the child is killed.
const KILL_GRACE: Duration = Duration::from_secs(1);

/// Probe `host` with a single echo request.
///
/// Any failure (missing program, non-zero exit, timeout) yields
/// [`ProbeResult::unreachable`].
pub async fn ping(program: &str, host: Ipv4Addr, timeout: Duration) -> ProbeResult {
    let wait_secs = timeout.as_secs().max(1);

    let mut command = Command::new(program);
    command
        .args(["-n", "-c", "1"])
        .args(wait_args(timeout))
        .arg(host.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout + KILL_GRACE, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => {
            warn!(program, %host, error = %err, "failed to run ping");
            return ProbeResult::unreachable();
        }
        Err(_) => {
            debug!(%host, timeout_secs = wait_secs, "probe timed out");
            return ProbeResult::unreachable();
        }
    };

    if !output.status.success() {
        debug!(%host, status = %output.status, "host did not answer");
        return ProbeResult::unreachable();
    }

    let latency = parse_latency(&String::from_utf8_lossy(&output.stdout));
    debug!(%host, ?latency, "host is alive");
    ProbeResult::reachable(latency)
}

/// The per-reply wait flag in the unit the platform's `ping` expects.
fn wait_args(timeout: Duration) -> [String; 2] {
    let value = if cfg!(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd"
    )) {
        timeout.as_millis().max(1000).to_string()
    } else {
        timeout.as_secs().max(1).to_string()
    };
    ["-W".to_owned(), value]
}

/// Extract the round-trip time in milliseconds from `ping` output.
///
/// Understands `time=0.045 ms`, `time=12ms` and the sub-millisecond
/// `time<1ms` form.
pub fn parse_latency(output: &str) -> Option<f64> {
    let (_, rest) = output
        .split_once("time=")
        .or_else(|| output.split_once("time<"))?;
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINUX_OUTPUT: &str = "\
PING 10.0.0.5 (10.0.0.5) 56(84) bytes of data.
64 bytes from 10.0.0.5: icmp_seq=1 ttl=64 time=0.412 ms

--- 10.0.0.5 ping statistics ---
1 packets transmitted, 1 received, 0% packet loss, time 0ms
rtt min/avg/max/mdev = 0.412/0.412/0.412/0.000 ms
";

    #[test]
    fn parses_fractional_latency() {
        assert_eq!(parse_latency(LINUX_OUTPUT), Some(0.412));
    }

    #[test]
    fn parses_integer_latency_without_space() {
        assert_eq!(
            parse_latency("Reply from 10.0.0.5: bytes=32 time=12ms TTL=128"),
            Some(12.0)
        );
    }

    #[test]
    fn parses_sub_millisecond_marker() {
        assert_eq!(
            parse_latency("Reply from 10.0.0.5: bytes=32 time<1ms TTL=128"),
            Some(1.0)
        );
    }

    #[test]
    fn no_latency_in_unrelated_output() {
        assert_eq!(parse_latency("Request timeout for icmp_seq 0"), None);
        assert_eq!(parse_latency(""), None);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn wait_is_whole_seconds_on_linux() {
        assert_eq!(wait_args(Duration::from_secs(5)), ["-W", "5"]);
        assert_eq!(wait_args(Duration::from_millis(200)), ["-W", "1"]);
    }

    #[test]
    #[cfg(target_os = "macos")]
    fn wait_is_milliseconds_on_macos() {
        assert_eq!(wait_args(Duration::from_secs(5)), ["-W", "5000"]);
        assert_eq!(wait_args(Duration::from_millis(200)), ["-W", "1000"]);
    }

    #[tokio::test]
    async fn successful_exit_counts_as_alive() {
        let result = ping("true", Ipv4Addr::LOCALHOST, Duration::from_secs(1)).await;
        assert!(result.alive);
        assert_eq!(result.latency_millis, None);
    }

    #[tokio::test]
    async fn failing_exit_counts_as_unreachable() {
        let result = ping("false", Ipv4Addr::LOCALHOST, Duration::from_secs(1)).await;
        assert_eq!(result, ProbeResult::unreachable());
    }

    #[tokio::test]
    async fn missing_program_counts_as_unreachable() {
        let result = ping(
            "wolbot-no-such-ping-binary",
            Ipv4Addr::LOCALHOST,
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(result, ProbeResult::unreachable());
    }
}

use core::time::Duration;

use xusb_if::{PadctlError, ops::Kernel};

use crate::err::Result;

/// 轮询状态位的总期限
pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);
/// 两次采样之间的间隔
pub const POLL_INTERVAL: Duration = Duration::from_micros(10);

/// 阻塞等待区间 `[min, max]` 微秒
///
/// [`Kernel`] 只提供定长延时，这里固定睡满下限 `min_us`，保证硬件要求的
/// 最短稳定时间。`max_us` 记录硬件允许的上界，仅在 debug 构建中校验区间合法。
pub fn usleep_range(kernel: &dyn Kernel, min_us: u64, max_us: u64) {
    debug_assert!(min_us <= max_us);
    kernel.delay(Duration::from_micros(min_us));
}

pub fn udelay(kernel: &dyn Kernel, us: u64) {
    kernel.delay(Duration::from_micros(us));
}

/// 周期性采样 `cond`，直到它为真或超过 `timeout`
pub fn poll_timeout(
    kernel: &dyn Kernel,
    timeout: Duration,
    interval: Duration,
    mut cond: impl FnMut() -> bool,
) -> Result {
    let deadline = kernel.now() + timeout;
    loop {
        if cond() {
            return Ok(());
        }
        if kernel.now() >= deadline {
            return Err(PadctlError::Timeout);
        }
        kernel.delay(interval);
    }
}

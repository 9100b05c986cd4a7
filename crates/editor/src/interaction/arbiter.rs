/// Gate on camera orbit input.
///
/// Every `suspend` must be paired with one `resume`; orbit input is accepted
/// only when nothing holds a suspension. Extra `resume` calls are ignored.
#[derive(Debug, Default)]
pub struct CameraOrbitArbiter {
    suspended: u32,
}

impl CameraOrbitArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suspend(&mut self) {
        self.suspended += 1;
        tracing::debug!("Camera orbit suspended (holders: {})", self.suspended);
    }

    pub fn resume(&mut self) {
        if self.suspended == 0 {
            tracing::debug!("Camera orbit resume without matching suspend; ignored");
            return;
        }
        self.suspended -= 1;
        if self.suspended == 0 {
            tracing::debug!("Camera orbit resumed");
        }
    }

    /// Drop every outstanding suspension
    pub fn force_resume(&mut self) {
        if self.suspended > 0 {
            tracing::warn!("Forcing camera orbit on ({} holders dropped)", self.suspended);
        }
        self.suspended = 0;
    }

    pub fn is_enabled(&self) -> bool {
        self.suspended == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_enabled() {
        assert!(CameraOrbitArbiter::new().is_enabled());
    }

    #[test]
    fn test_suspend_resume_pair() {
        let mut a = CameraOrbitArbiter::new();
        a.suspend();
        assert!(!a.is_enabled());
        a.resume();
        assert!(a.is_enabled());
    }

    #[test]
    fn test_nested_suspensions() {
        let mut a = CameraOrbitArbiter::new();
        a.suspend();
        a.suspend();
        a.resume();
        assert!(!a.is_enabled());
        a.resume();
        assert!(a.is_enabled());
    }

    #[test]
    fn test_unmatched_resume_is_noop() {
        let mut a = CameraOrbitArbiter::new();
        a.resume();
        a.resume();
        assert!(a.is_enabled());
        a.suspend();
        assert!(!a.is_enabled());
    }

    #[test]
    fn test_force_resume() {
        let mut a = CameraOrbitArbiter::new();
        a.suspend();
        a.suspend();
        a.force_resume();
        assert!(a.is_enabled());
    }
}

use thiserror::Error;

/// Read projection of one asynchronous operation bound to UI-owned state.
///
/// The three fields move independently: `loading` may coexist with stale
/// `data` (stale-while-revalidate), and a failed update keeps the last good
/// `data` next to its `error`. The four phase predicates are derived from
/// the fields, never stored.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsyncState<T: Clone> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Normalized failure of an operation.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum OpError {
    #[error("{0}")]
    Message(String),
    #[error("Operation produced no value!")]
    Empty,
}

impl OpError {
    pub fn is_empty(&self) -> bool {
        matches!(self, OpError::Empty)
    }

    pub fn is_message(&self) -> bool {
        matches!(self, OpError::Message(_))
    }
}

impl<T: Clone> AsyncState<T> {
    pub fn idle() -> Self {
        AsyncState {
            data: None,
            loading: false,
            error: None,
        }
    }

    pub fn loading(value: Option<T>) -> Self {
        AsyncState {
            data: value,
            loading: true,
            error: None,
        }
    }

    pub fn success(value: T) -> Self {
        AsyncState {
            data: Some(value),
            loading: false,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, value: Option<T>) -> Self {
        AsyncState {
            data: value,
            loading: false,
            error: Some(message.into()),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.loading && self.error.is_none() && self.data.is_none()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_error(&self) -> bool {
        !self.loading && self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        !self.loading && self.error.is_none() && self.data.is_some()
    }

    /// Terminal state: settled in success or error.
    pub fn is_settled(&self) -> bool {
        self.is_success() || self.is_error()
    }

    pub fn data_ref(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error_ref(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin(&mut self, clear_data: bool) {
        if clear_data {
            self.data = None;
        }
        self.error = None;
        self.loading = true;
    }

    pub(crate) fn finish_success(&mut self, data: Option<T>) {
        self.data = data;
        self.error = None;
        self.loading = false;
    }

    pub(crate) fn finish_failure(&mut self, message: String) {
        self.error = Some(message);
        self.loading = false;
    }
}

impl<T: Clone> Default for AsyncState<T> {
    fn default() -> Self {
        AsyncState::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle() {
        let idle: AsyncState<i32> = AsyncState::default();
        assert!(idle.is_idle());
        assert!(!idle.is_loading());
        assert!(!idle.is_error());
        assert!(!idle.is_success());
        assert!(!idle.is_settled());
        assert!(idle.data_ref().is_none());
    }

    #[test]
    fn test_loading() {
        let loading = AsyncState::loading(None::<i32>);
        assert!(loading.is_loading());
        assert!(!loading.is_idle());
        assert!(!loading.is_error());
        assert!(!loading.is_success());
    }

    #[test]
    fn test_loading_with_stale_data() {
        let loading = AsyncState::loading(Some(7));
        assert!(loading.is_loading());
        assert!(!loading.is_idle());
        assert!(!loading.is_error());
        assert!(!loading.is_success());
        assert_eq!(loading.data_ref(), Some(&7));
    }

    #[test]
    fn test_success() {
        let success = AsyncState::success(8);
        assert!(success.is_success());
        assert!(success.is_settled());
        assert!(!success.is_idle());
        assert!(!success.is_loading());
        assert!(!success.is_error());
        assert_eq!(success.data_ref(), Some(&8));
    }

    #[test]
    fn test_failure() {
        let fail = AsyncState::failure("Connection failed", Some(50));
        assert!(fail.is_error());
        assert!(fail.is_settled());
        assert!(!fail.is_idle());
        assert!(!fail.is_loading());
        assert!(!fail.is_success());
        assert_eq!(fail.data_ref(), Some(&50));
        assert_eq!(fail.error_ref(), Some("Connection failed"));
    }

    #[test]
    fn test_error_cleared_when_loading_resumes() {
        let mut state = AsyncState::failure("boom", None::<i32>);
        state.begin(false);
        assert!(state.is_loading());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_op_error_display() {
        assert_eq!(
            OpError::Message("Connection failed".to_string()).to_string(),
            "Connection failed"
        );
        assert_eq!(OpError::Empty.to_string(), "Operation produced no value!");
        assert!(OpError::Empty.is_empty());
        assert!(OpError::Message(String::new()).is_message());
    }
}

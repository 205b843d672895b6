/// Outcome of a guarded feature call
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch<T> {
    /// Fresh result for the current topic
    Completed(T),
    /// Another call of the same feature was running; nothing was sent
    InFlight,
    /// A newer topic started while this call ran; the result is stale
    Superseded(T),
}

impl<T> Dispatch<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded(_))
    }

    /// The result if it is still current
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Dispatch<U> {
        match self {
            Self::Completed(value) => Dispatch::Completed(f(value)),
            Self::InFlight => Dispatch::InFlight,
            Self::Superseded(value) => Dispatch::Superseded(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_completed_yields_value() {
        assert_eq!(Dispatch::Completed(1).completed(), Some(1));
        assert_eq!(Dispatch::Superseded(1).completed(), None);
        assert_eq!(Dispatch::<i32>::InFlight.completed(), None);
        assert_eq!(Dispatch::Superseded(2).map(|v| v * 2), Dispatch::Superseded(4));
    }
}

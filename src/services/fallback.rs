//! AI-primary, fallback-secondary request pattern.
//!
//! Every AI-backed capability goes through [`serve_with_fallback`]: the
//! primary future is the AI service call, the fallback future is a local
//! computation (geospatial query, Maps provider, or a static default). A
//! failed primary is logged at warn and never surfaced; only a failure of
//! both paths propagates to the handler.

use std::future::Future;

pub(crate) const POWERED_BY_AI: &str = "AcciNex AI";
pub(crate) const POWERED_BY_DB: &str = "DB Fallback";
pub(crate) const POWERED_BY_MAPS: &str = "Google Maps Fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Provenance {
    Ai,
    Fallback,
}

#[derive(Debug)]
pub(crate) struct Served<T> {
    pub(crate) value: T,
    pub(crate) provenance: Provenance,
}

impl<T> Served<T> {
    pub(crate) fn powered_by(&self, fallback_tag: &'static str) -> &'static str {
        match self.provenance {
            Provenance::Ai => POWERED_BY_AI,
            Provenance::Fallback => fallback_tag,
        }
    }
}

pub(crate) async fn serve_with_fallback<T, P, F>(
    capability: &'static str,
    primary: P,
    fallback: F,
) -> anyhow::Result<Served<T>>
where
    P: Future<Output = anyhow::Result<T>>,
    F: Future<Output = anyhow::Result<T>>,
{
    match primary.await {
        Ok(value) => Ok(Served { value, provenance: Provenance::Ai }),
        Err(err) => {
            tracing::warn!(capability, error = %err, "AI service unavailable, using fallback");
            let value = fallback.await?;
            Ok(Served { value, provenance: Provenance::Fallback })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn primary_success_is_attributed_to_ai() {
        let served = serve_with_fallback(
            "test",
            async { Ok::<_, anyhow::Error>(1) },
            async { Ok(2) },
        )
        .await
        .expect("served");

        assert_eq!(served.value, 1);
        assert_eq!(served.provenance, Provenance::Ai);
        assert_eq!(served.powered_by(POWERED_BY_DB), POWERED_BY_AI);
    }

    #[tokio::test]
    async fn primary_failure_runs_fallback() {
        let served = serve_with_fallback(
            "test",
            async { Err::<i32, _>(anyhow::anyhow!("timeout")) },
            async { Ok(2) },
        )
        .await
        .expect("served");

        assert_eq!(served.value, 2);
        assert_eq!(served.provenance, Provenance::Fallback);
        assert_eq!(served.powered_by(POWERED_BY_DB), POWERED_BY_DB);
        assert_eq!(served.powered_by(POWERED_BY_MAPS), POWERED_BY_MAPS);
    }

    #[tokio::test]
    async fn both_paths_failing_returns_the_fallback_error() {
        let result = serve_with_fallback(
            "test",
            async { Err::<i32, _>(anyhow::anyhow!("timeout")) },
            async { Err(anyhow::anyhow!("db down")) },
        )
        .await;

        let err = result.expect_err("should fail");
        assert!(err.to_string().contains("db down"));
    }
}

//! Pipeline: runs one request through every stage in order.

use std::sync::Arc;

use notetube_core::{Keyword, PipelineTuning, RankedVideo, StageEvent, StageStatus};
use notetube_ingest::{DocumentExtractor, KeywordAdapter};
use notetube_query::QuerySynthesizer;
use notetube_video::{acquire, AcquireParams, VideoPlatform};
use tracing::{debug, error, info, warn};

use crate::ranking::rank;
use crate::sink::StageSink;
use crate::types::*;

/// Shared collaborators plus fixed tuning. Built once at startup.
pub struct Pipeline {
    extractor: Arc<dyn DocumentExtractor>,
    keywords: Arc<KeywordAdapter>,
    synthesizer: Arc<QuerySynthesizer>,
    platform: Arc<dyn VideoPlatform>,
    tuning: PipelineTuning,
}

impl Pipeline {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        keywords: Arc<KeywordAdapter>,
        synthesizer: Arc<QuerySynthesizer>,
        platform: Arc<dyn VideoPlatform>,
        tuning: PipelineTuning,
    ) -> Self {
        Self {
            extractor,
            keywords,
            synthesizer,
            platform,
            tuning,
        }
    }

    pub fn tuning(&self) -> &PipelineTuning {
        &self.tuning
    }

    pub fn synthesizer(&self) -> &QuerySynthesizer {
        &self.synthesizer
    }

    /// Name of the active keyword strategy.
    pub fn keyword_algorithm(&self) -> &'static str {
        self.keywords.algorithm_name()
    }

    /// Run the pipeline, reporting each stage to `sink`.
    ///
    /// Input errors are emitted as an `error` event and returned. A sink that
    /// stops accepting events ends the run with [`PipelineError::Cancelled`].
    pub async fn run(
        &self,
        input: PipelineInput,
        sink: &mut dyn StageSink,
    ) -> Result<PipelineResult, PipelineError> {
        match self.run_stages(input, sink).await {
            Err(PipelineError::Input(message)) => {
                info!("Request rejected: {}", message);
                let event = StageEvent::error(message.clone())
                    .map_err(|e| PipelineError::Internal(e.to_string()))?;
                if !sink.emit(event) {
                    return Err(PipelineError::Cancelled);
                }
                Err(PipelineError::Input(message))
            }
            Err(PipelineError::Cancelled) => {
                info!("Consumer disconnected, pipeline stopped");
                Err(PipelineError::Cancelled)
            }
            other => other,
        }
    }

    async fn run_stages(
        &self,
        input: PipelineInput,
        sink: &mut dyn StageSink,
    ) -> Result<PipelineResult, PipelineError> {
        let file_text = match input.file {
            Some(file) => Some(self.read_file(file, sink).await?),
            None => None,
        };

        let document = merge_text(file_text.as_deref(), input.text.as_deref());
        if document.is_empty() {
            return Err(PipelineError::Input("no text provided".into()));
        }
        debug!("Document has {} characters", document.chars().count());

        // Keywords
        emit(sink, stage(StageStatus::ExtractingKeywords, "extracting keywords")?)?;
        let (keywords, language) = self.extract_keywords(document).await;
        info!("Extracted {} keywords (language={})", keywords.len(), language);
        emit(
            sink,
            stage(StageStatus::KeywordsExtracted, "keywords extracted")?
                .with_keywords(&keywords)
                .with_extra("language", language.clone()),
        )?;

        // Queries
        emit(sink, stage(StageStatus::GeneratingQueries, "generating search queries")?)?;
        let queries = self
            .synthesizer
            .synthesize(&keywords, self.tuning.max_queries, Some(language.as_str()))
            .await;
        emit(
            sink,
            stage(StageStatus::QueriesGenerated, "search queries generated")?
                .with_keywords(&keywords)
                .with_queries(&queries),
        )?;

        // Videos
        emit(
            sink,
            stage(StageStatus::YoutubeSearchStarted, "searching videos")?.with_queries(&queries),
        )?;
        let (lists, failed) = self.acquire_all(&queries, &language, sink).await?;
        let candidates: usize = lists.iter().map(Vec::len).sum();
        let mut videos = rank(lists);
        info!(
            "Video search finished: {} candidates, {} unique, {} failed queries",
            candidates,
            videos.len(),
            failed
        );
        emit(
            sink,
            stage(StageStatus::YoutubeSearchCompleted, "video search completed")?
                .with_extra("candidates", candidates)
                .with_extra("failed_queries", failed),
        )?;

        videos.truncate(self.tuning.top_k);
        emit(
            sink,
            stage(StageStatus::ProcessingComplete, "processing complete")?
                .with_keywords(&keywords)
                .with_queries(&queries)
                .with_videos(&videos),
        )?;

        Ok(PipelineResult {
            keywords,
            language,
            queries,
            videos,
        })
    }

    async fn read_file(
        &self,
        file: UploadedFile,
        sink: &mut dyn StageSink,
    ) -> Result<String, PipelineError> {
        let UploadedFile { filename, bytes } = file;
        emit(
            sink,
            stage(StageStatus::FileReceived, "file received")?
                .with_extra("filename", filename.clone()),
        )?;

        if !self.extractor.supports(&filename) {
            return Err(PipelineError::Input(format!(
                "unsupported file format: {}",
                filename
            )));
        }

        let extractor = Arc::clone(&self.extractor);
        let name = filename.clone();
        let extracted =
            tokio::task::spawn_blocking(move || extractor.extract(&bytes, &name)).await;
        let text = match extracted {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Failed to extract {}: {}", filename, e);
                return Err(PipelineError::Input(format!("could not read file: {}", filename)));
            }
            Err(e) => {
                error!("Extraction task for {} aborted: {}", filename, e);
                return Err(PipelineError::Input(format!("could not read file: {}", filename)));
            }
        };

        emit(
            sink,
            stage(StageStatus::FileProcessed, "file processed")?
                .with_extra("characters", text.chars().count()),
        )?;
        Ok(text)
    }

    async fn extract_keywords(&self, document: String) -> (Vec<Keyword>, String) {
        let adapter = Arc::clone(&self.keywords);
        let top_n = self.tuning.keyword_top_n;
        let range = (self.tuning.ngram_min, self.tuning.ngram_max);
        let fallback = self.tuning.fallback_language.clone();

        match tokio::task::spawn_blocking(move || adapter.extract(&document, top_n, range, None))
            .await
        {
            Ok(extracted) => (extracted.keywords, extracted.language),
            Err(e) => {
                error!("Keyword extraction task aborted: {}", e);
                (Vec::new(), fallback)
            }
        }
    }

    /// Acquire every query in order. A failing query contributes an empty
    /// list and is counted.
    async fn acquire_all(
        &self,
        queries: &[String],
        language: &str,
        sink: &mut dyn StageSink,
    ) -> Result<(Vec<Vec<RankedVideo>>, usize), PipelineError> {
        let params = AcquireParams {
            language: language.to_string(),
            max_results: self.tuning.max_results,
            min_subscribers: self.tuning.min_subscribers,
            min_likes: self.tuning.min_likes,
            category: self.tuning.category_id.clone(),
        };

        let mut lists = Vec::with_capacity(queries.len());
        let mut failed = 0usize;
        for query in queries {
            if sink.is_closed() {
                return Err(PipelineError::Cancelled);
            }
            match acquire(self.platform.as_ref(), query, &params).await {
                Ok(videos) => {
                    debug!("Query '{}' kept {} videos", query, videos.len());
                    lists.push(videos);
                }
                Err(e) => {
                    warn!("Video search failed for query '{}': {}", query, e);
                    failed += 1;
                    lists.push(Vec::new());
                }
            }
        }
        Ok((lists, failed))
    }
}

/// File text and free text, newline-joined and trimmed.
pub fn merge_text(file_text: Option<&str>, text: Option<&str>) -> String {
    let parts: Vec<&str> = [file_text, text].into_iter().flatten().collect();
    parts.join("\n").trim().to_string()
}

fn stage(status: StageStatus, message: &str) -> Result<StageEvent, PipelineError> {
    StageEvent::new(status, message).map_err(|e| PipelineError::Internal(e.to_string()))
}

fn emit(sink: &mut dyn StageSink, event: StageEvent) -> Result<(), PipelineError> {
    debug!("Stage {}", event.status);
    if sink.emit(event) {
        Ok(())
    } else {
        Err(PipelineError::Cancelled)
    }
}

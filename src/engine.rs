//! Process-wide facade owning the dataset, the model cache, and configuration.

use std::sync::Arc;

use tracing::info;

use crate::analytics::{
    CongestionView, Findings, FoodView, InterventionsView, KpiReport, SatisfactionView,
    TransportView,
};
use crate::config::EngineConfig;
use crate::data::{DataPipeline, Dataset};
use crate::error::Result;
use crate::model::ModelCache;
use crate::sim::{SimulationEngine, SimulationResult};

/// Entry point for every analytics operation.
///
/// Built once at startup and shared behind `Arc`. All methods take `&self`
/// and read only in-memory state; models train on first use (or in
/// [`CampusEngine::warm_up`]).
pub struct CampusEngine {
    config: EngineConfig,
    dataset: Arc<Dataset>,
    models: ModelCache,
}

impl CampusEngine {
    /// Runs the pipeline over `config.data.path`.
    ///
    /// # Errors
    ///
    /// Any pipeline error; see [`DataPipeline::run`].
    pub fn load(config: EngineConfig) -> Result<Self> {
        let dataset = DataPipeline::from_config(&config.data).run()?;
        Ok(Self::from_dataset(config, dataset))
    }

    /// Wraps an already processed dataset.
    pub fn from_dataset(config: EngineConfig, dataset: Dataset) -> Self {
        let dataset = Arc::new(dataset);
        let models = ModelCache::new(
            Arc::clone(&dataset),
            config.split.clone(),
            config.forest.clone(),
        );
        Self {
            config,
            dataset,
            models,
        }
    }

    /// Trains both models now so the first request does not pay for it.
    pub fn warm_up(&self) -> Result<()> {
        self.models.warm_up()?;
        info!(records = self.dataset.len(), "models ready");
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn models(&self) -> &ModelCache {
        &self.models
    }

    pub fn kpis(&self) -> Result<KpiReport> {
        let demand = self.models.demand()?;
        let satisfaction = self.models.satisfaction()?;
        Ok(KpiReport::compute(
            &self.dataset,
            demand.metrics.r2,
            satisfaction.metrics.r2,
        ))
    }

    /// Never fails; returns `Result` for a uniform call surface.
    pub fn congestion(&self) -> Result<CongestionView> {
        Ok(CongestionView::compute(
            &self.dataset,
            self.config.congestion.bottleneck_threshold,
        ))
    }

    pub fn food_analysis(&self) -> Result<FoodView> {
        let demand = self.models.demand()?;
        Ok(FoodView::compute(&self.dataset, demand.metrics))
    }

    pub fn transport_analysis(&self) -> Result<TransportView> {
        Ok(TransportView::compute(&self.dataset, &self.config.transport))
    }

    pub fn satisfaction_impact(&self) -> Result<SatisfactionView> {
        let model = self.models.satisfaction()?;
        Ok(SatisfactionView::compute(
            &self.dataset,
            model,
            self.config.satisfaction.comparison_limit,
        ))
    }

    pub fn interventions(&self) -> Result<InterventionsView> {
        let congestion = self.congestion()?;
        let food = self.food_analysis()?;
        let transport = self.transport_analysis()?;
        let satisfaction = self.models.satisfaction()?;
        Ok(InterventionsView::compute(&Findings {
            dataset: &self.dataset,
            congestion: &congestion,
            food: &food,
            transport: &transport,
            satisfaction,
        }))
    }

    /// # Errors
    ///
    /// `InvalidParameter` for out-of-range reductions, or the cached
    /// satisfaction model training error.
    pub fn simulate(
        &self,
        congestion_reduction_pct: f64,
        delay_reduction_pct: f64,
    ) -> Result<SimulationResult> {
        self.simulation()?
            .simulate(congestion_reduction_pct, delay_reduction_pct)
    }

    /// What-if engine over the cached satisfaction model.
    pub fn simulation(&self) -> Result<SimulationEngine<'_>> {
        let model = self.models.satisfaction()?;
        Ok(SimulationEngine::new(&self.dataset, model))
    }
}

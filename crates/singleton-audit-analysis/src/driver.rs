//! Per-call-site singleton safety analysis
//!
//! For every call expression the driver:
//! 1. Skips anything that is not a call into the registration API
//! 2. Maps the call to a [`DependencyRegistration`], reporting unknown shapes
//! 3. Inspects the registered type of every singleton
//! 4. Reports singletons whose state can change after construction
//!
//! Call sites are independent, so [`SingletonAnalyzer::analyze_parallel`] can
//! fan them out over a rayon pool while keeping the report order stable.

use crate::config::{AnalyzerConfig, AnalyzerConfigError};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::registration::{CallSite, DependencyRegistration, ObjectScope, RegistrationMapper};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use singleton_audit_core::{ImmutabilityPolicy, InspectionFlags, MutabilityInspector, SymbolTable};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Flags every singleton inspection runs with.
///
/// Unsealed types are judged by their own members, and immutability markers
/// are not trusted: a singleton has to be structurally immutable.
pub const SINGLETON_INSPECTION_FLAGS: InspectionFlags =
    InspectionFlags::ALLOW_UNSEALED.union(InspectionFlags::IGNORE_IMMUTABILITY_ATTRIBUTE);

/// What the analysis concluded about one call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    /// Not a call into the registration API
    Skipped,
    /// A registration that is not shared across the container's lifetime
    NotSingleton(ObjectScope),
    /// A singleton whose type is structurally immutable
    Immutable,
    Reported(Diagnostic),
}

/// Counters for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub sites_seen: usize,
    pub registration_calls: usize,
    pub registrations_mapped: usize,
    pub singletons_inspected: usize,
    pub unsafe_singletons: usize,
    pub unknown_singleton_types: usize,
    pub unknown_registrations: usize,
    /// The run stopped before every call site was analyzed
    pub cancelled: bool,
}

impl AnalysisSummary {
    pub fn record(&mut self, outcome: &SiteOutcome) {
        self.sites_seen += 1;
        match outcome {
            SiteOutcome::Skipped => {}
            SiteOutcome::NotSingleton(_) => {
                self.registration_calls += 1;
                self.registrations_mapped += 1;
            }
            SiteOutcome::Immutable => {
                self.registration_calls += 1;
                self.registrations_mapped += 1;
                self.singletons_inspected += 1;
            }
            SiteOutcome::Reported(diagnostic) => {
                self.registration_calls += 1;
                match diagnostic.kind {
                    DiagnosticKind::UnsafeSingletonField { .. } => {
                        self.registrations_mapped += 1;
                        self.singletons_inspected += 1;
                        self.unsafe_singletons += 1;
                    }
                    DiagnosticKind::SingletonRegistrationTypeUnknown => {
                        self.registrations_mapped += 1;
                        self.unknown_singleton_types += 1;
                    }
                    DiagnosticKind::RegistrationKindUnknown => self.unknown_registrations += 1,
                }
            }
        }
    }

    pub fn diagnostic_count(&self) -> usize {
        self.unsafe_singletons + self.unknown_singleton_types + self.unknown_registrations
    }
}

/// Analyzes registration call sites against one symbol table
#[derive(Debug)]
pub struct SingletonAnalyzer<'a> {
    table: &'a SymbolTable,
    policy: ImmutabilityPolicy,
    mapper: RegistrationMapper,
}

impl<'a> SingletonAnalyzer<'a> {
    pub fn new(table: &'a SymbolTable, policy: ImmutabilityPolicy, mapper: RegistrationMapper) -> Self {
        Self { table, policy, mapper }
    }

    pub fn from_config(table: &'a SymbolTable, config: &AnalyzerConfig) -> Result<Self, AnalyzerConfigError> {
        let policy =
            ImmutabilityPolicy::from_config(&config.immutability).map_err(AnalyzerConfigError::Immutability)?;
        let mapper =
            RegistrationMapper::new(config.registration.clone()).map_err(AnalyzerConfigError::Registration)?;
        Ok(Self::new(table, policy, mapper))
    }

    pub fn table(&self) -> &SymbolTable {
        self.table
    }

    pub fn policy(&self) -> &ImmutabilityPolicy {
        &self.policy
    }

    pub fn mapper(&self) -> &RegistrationMapper {
        &self.mapper
    }

    /// Analyze a single call expression
    pub fn analyze_call_site(&self, site: &CallSite) -> SiteOutcome {
        let Some(method) = site.method.and_then(|id| self.table.method(id)) else {
            return SiteOutcome::Skipped;
        };
        if !self.mapper.is_registration_method(method, self.table) {
            return SiteOutcome::Skipped;
        }

        let outcome = match self
            .mapper
            .try_map_registration_method(method, &site.arguments, self.table)
        {
            None => self.report(site, DiagnosticKind::RegistrationKindUnknown),
            Some(registration) => self.check_registration(site, &registration),
        };
        debug!(location = %site.location, method = %method.name, ?outcome, "analyzed registration");
        outcome
    }

    fn check_registration(&self, site: &CallSite, registration: &DependencyRegistration) -> SiteOutcome {
        if registration.scope() != ObjectScope::Singleton {
            return SiteOutcome::NotSingleton(registration.scope());
        }

        let ty = match registration.type_to_inspect() {
            Some(ty) if !self.table.contains_error(ty) => ty,
            _ => return self.report(site, DiagnosticKind::SingletonRegistrationTypeUnknown),
        };

        let result = MutabilityInspector::new(self.table, &self.policy).inspect_type(ty, SINGLETON_INSPECTION_FLAGS);
        match result.primary_reason() {
            None => SiteOutcome::Immutable,
            Some(reason) => self.report(
                site,
                DiagnosticKind::UnsafeSingletonField {
                    type_name: self.table.display_name(ty),
                    reason: reason.clone(),
                },
            ),
        }
    }

    fn report(&self, site: &CallSite, kind: DiagnosticKind) -> SiteOutcome {
        SiteOutcome::Reported(Diagnostic::new(site.location.clone(), kind))
    }

    /// Analyze call sites in order, reporting through `sink`.
    ///
    /// Cancellation is observed between call sites; a site that has started
    /// is always finished.
    pub fn analyze(
        &self,
        sites: &[CallSite],
        sink: &mut dyn DiagnosticSink,
        cancel: &CancellationToken,
    ) -> AnalysisSummary {
        let mut summary = AnalysisSummary::default();
        for site in sites {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let outcome = self.analyze_call_site(site);
            summary.record(&outcome);
            if let SiteOutcome::Reported(diagnostic) = outcome {
                sink.report(diagnostic);
            }
        }
        log_summary(&summary);
        summary
    }

    /// Analyze call sites on the rayon pool.
    ///
    /// Diagnostics come back in call-site order, identical to what
    /// [`analyze`](Self::analyze) would report for the same input.
    pub fn analyze_parallel(&self, sites: &[CallSite], cancel: &CancellationToken) -> (Vec<Diagnostic>, AnalysisSummary) {
        let outcomes: Vec<Option<SiteOutcome>> = sites
            .par_iter()
            .map(|site| (!cancel.is_cancelled()).then(|| self.analyze_call_site(site)))
            .collect();

        let mut summary = AnalysisSummary::default();
        let mut diagnostics = Vec::new();
        for outcome in outcomes {
            let Some(outcome) = outcome else {
                summary.cancelled = true;
                continue;
            };
            summary.record(&outcome);
            if let SiteOutcome::Reported(diagnostic) = outcome {
                diagnostics.push(diagnostic);
            }
        }
        log_summary(&summary);
        (diagnostics, summary)
    }
}

fn log_summary(summary: &AnalysisSummary) {
    info!(
        sites = summary.sites_seen,
        registrations = summary.registration_calls,
        singletons = summary.singletons_inspected,
        diagnostics = summary.diagnostic_count(),
        cancelled = summary.cancelled,
        "singleton analysis finished"
    );
}

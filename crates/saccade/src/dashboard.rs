//! Wiring between inputs and panels, and the dispatcher that keeps every
//! panel's output consistent with the latest inputs.

use crate::chart::ChartSpec;
use crate::config::DashboardConfig;
use crate::measure::Measure;
use crate::panels::{self, Panel, PanelContext, PanelError, PanelId};
use crate::selection::{Event, InputId, Inputs, default_trial};
use crate::table::Table;
use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Direction;
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("measure \"{0}\" is not in the catalog")]
    UnknownMeasure(Measure),
    #[error("panel dependencies form a cycle through {0}")]
    Cycle(String),
}

pub type PanelOutput = Result<ChartSpec, PanelError>;

// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// A value with a counter bumped on every replacement, so a renderer can
/// tell a recomputed output from the one it already drew.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    version: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self { version: 0, data }
    }

    pub fn get(&self) -> &T {
        &self.data
    }

    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version = self.version.wrapping_add(1);
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

// -------------------------------------------------------------------
// Dependency graph
// -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Input(InputId),
    Panel(PanelId),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Input(id) => write!(f, "input {id}"),
            Node::Panel(id) => write!(f, "panel {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Input change makes the panel re-render
    Feeds,
    /// Panel interactions produce the input
    Emits,
}

pub struct DependencyGraph {
    graph: StableGraph<Node, Link>,
    inputs: HashMap<InputId, NodeIndex>,
    order: Vec<PanelId>,
}

impl DependencyGraph {
    pub fn build(panels: &[Box<dyn Panel>]) -> Result<Self, DispatchError> {
        let mut graph = StableGraph::new();
        let inputs: HashMap<InputId, NodeIndex> = InputId::ALL
            .iter()
            .map(|&id| (id, graph.add_node(Node::Input(id))))
            .collect();

        for panel in panels {
            let node = graph.add_node(Node::Panel(panel.id()));
            for input in panel.inputs() {
                graph.add_edge(inputs[input], node, Link::Feeds);
            }
            if let Some(emitted) = panel.emits() {
                graph.add_edge(node, inputs[&emitted], Link::Emits);
            }
        }

        let sorted = toposort(&graph, None).map_err(|cycle| {
            DispatchError::Cycle(graph[cycle.node_id()].to_string())
        })?;
        let order = sorted
            .into_iter()
            .filter_map(|ix| match graph[ix] {
                Node::Panel(id) => Some(id),
                Node::Input(_) => None,
            })
            .collect();

        Ok(Self {
            graph,
            inputs,
            order,
        })
    }

    /// Panels in an order where every panel comes after the panels whose
    /// events it consumes.
    pub fn order(&self) -> &[PanelId] {
        &self.order
    }

    /// Panels fed directly by any of `changed`, in panel order. Inputs
    /// that change as a consequence must be listed in `changed` too.
    pub fn dependents(&self, changed: &[InputId]) -> Vec<PanelId> {
        let reached: BTreeSet<PanelId> = changed
            .iter()
            .flat_map(|input| {
                self.graph
                    .edges_directed(self.inputs[input], Direction::Outgoing)
            })
            .filter(|e| *e.weight() == Link::Feeds)
            .filter_map(|e| match self.graph[e.target()] {
                Node::Panel(id) => Some(id),
                Node::Input(_) => None,
            })
            .collect();
        self.order
            .iter()
            .copied()
            .filter(|id| reached.contains(id))
            .collect()
    }
}

// -------------------------------------------------------------------
// Dashboard
// -------------------------------------------------------------------

pub struct Dashboard {
    table: Arc<Table>,
    config: DashboardConfig,
    inputs: Inputs,
    panels: Vec<Box<dyn Panel>>,
    graph: DependencyGraph,
    outputs: BTreeMap<PanelId, Versioned<PanelOutput>>,
}

impl Dashboard {
    /// Seed the default selection and render every panel once.
    pub fn new(
        table: Arc<Table>,
        config: DashboardConfig,
    ) -> Result<Self, DispatchError> {
        let mut panels = panels::all();
        let graph = DependencyGraph::build(&panels)?;
        let order = graph.order();
        panels.sort_by_key(|p| order.iter().position(|&id| id == p.id()));
        let missing = config.measures.check_against(&table);
        if !missing.is_empty() {
            tracing::warn!(?missing, "catalog measures absent from dataset");
        }
        let inputs = Inputs::seeded(
            &table,
            config.initial_measure(),
            &config.default_selection,
        );

        let mut dashboard = Self {
            table,
            config,
            inputs,
            panels,
            graph,
            outputs: BTreeMap::new(),
        };
        dashboard.outputs = dashboard
            .panels
            .iter()
            .map(|p| (p.id(), Versioned::new(dashboard.render(p.as_ref()))))
            .collect();
        tracing::info!(
            rows = dashboard.table.len(),
            participant = %dashboard.inputs.overview_click.participant,
            "dashboard ready"
        );
        Ok(dashboard)
    }

    /// Apply one event and recompute exactly the panels depending on the
    /// inputs it changed. Returns the recomputed panels in the order they
    /// ran.
    pub fn dispatch(
        &mut self,
        event: Event,
    ) -> Result<Vec<PanelId>, DispatchError> {
        if let Event::MeasureSelected(m) = &event
            && !self.config.measures.contains(m)
        {
            return Err(DispatchError::UnknownMeasure(m.clone()));
        }

        let input = event.input();
        if !self.inputs.apply(event) {
            tracing::debug!(%input, "event left inputs unchanged");
            return Ok(Vec::new());
        }
        let mut changed = vec![input];
        changed.extend(self.follow_up(input));

        let dirty = self.graph.dependents(&changed);
        self.recompute(&dirty);
        tracing::info!(%input, recomputed = dirty.len(), "event dispatched");
        Ok(dirty)
    }

    /// Inputs that change as a consequence of `input` changing. A new
    /// participant or measure redraws the histogram, so a stale hover is
    /// dropped; a new participant keeps the selected trial only if it has
    /// one with that number.
    fn follow_up(&mut self, input: InputId) -> Vec<InputId> {
        let mut changed = Vec::new();
        if matches!(input, InputId::OverviewClick | InputId::Measure)
            && self.inputs.apply(Event::HistogramHovered(None))
        {
            changed.push(InputId::HistogramHover);
        }
        if input == InputId::OverviewClick {
            let trial = default_trial(
                &self.table,
                &self.inputs.overview_click.participant,
                self.inputs.participant_click.trial,
            );
            if self.inputs.apply(Event::ParticipantClicked(trial)) {
                changed.push(InputId::ParticipantClick);
            }
        }
        changed
    }

    fn render(&self, panel: &dyn Panel) -> PanelOutput {
        let ctx = PanelContext {
            table: &self.table,
            inputs: &self.inputs,
            config: &self.config,
        };
        let output = panel.render(&ctx);
        if let Err(e) = &output {
            tracing::warn!(panel = %panel.id(), "{e}");
        }
        output
    }

    /// Panels are kept in dependency order, so `dirty` runs upstream first.
    fn recompute(&mut self, dirty: &[PanelId]) {
        let fresh: Vec<(PanelId, PanelOutput)> = self
            .panels
            .iter()
            .filter(|p| dirty.contains(&p.id()))
            .map(|p| (p.id(), self.render(p.as_ref())))
            .collect();
        for (id, output) in fresh {
            if let Some(slot) = self.outputs.get_mut(&id) {
                slot.set(output);
                tracing::debug!(
                    panel = %id,
                    version = slot.version(),
                    "recomputed"
                );
            }
        }
    }

    pub fn output(&self, id: PanelId) -> Option<&PanelOutput> {
        self.outputs.get(&id).map(Versioned::get)
    }

    /// The panel's chart, if its last render succeeded.
    pub fn chart(&self, id: PanelId) -> Option<&ChartSpec> {
        self.output(id).and_then(|o| o.as_ref().ok())
    }

    pub fn version(&self, id: PanelId) -> Option<u64> {
        self.outputs.get(&id).map(Versioned::version)
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn order(&self) -> &[PanelId] {
        self.graph.order()
    }
}

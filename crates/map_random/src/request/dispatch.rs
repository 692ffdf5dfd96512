//! Routing of generation requests to the catalog and the shape field generator.
//!
//! Dispatch never fails as a whole: problems are reported as [`Notification`]s on the
//! [`GenerationOutput`] next to whatever was produced.
use std::collections::BTreeSet;
use std::sync::Arc;

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::attribute::AttributeValueResolver;
use crate::distribution::DistributionCatalog;
use crate::field::{GeneratedShape, ShapeFieldConfig, ShapeFieldGenerator, ShapeKind};
use crate::geometry::Envelope;
use crate::notification::Notification;
use crate::request::{Category, GenerationRequest, Urn};

/// Payload of a [`GenerationOutput`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputData {
    #[default]
    None,
    Scalar(f64),
    Shapes(Vec<GeneratedShape>),
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationOutput {
    pub data: OutputData,
    pub notifications: Vec<Notification>,
}

impl GenerationOutput {
    fn notify(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn scalar(&self) -> Option<f64> {
        match self.data {
            OutputData::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn shapes(&self) -> &[GeneratedShape] {
        match &self.data {
            OutputData::Shapes(shapes) => shapes,
            _ => &[],
        }
    }

    pub fn has_errors(&self) -> bool {
        self.notifications.iter().any(Notification::is_error)
    }
}

/// Where a request is evaluated. Spatial requests need an envelope.
#[derive(Clone, Debug, Default)]
pub struct GenerationContext {
    pub envelope: Option<Envelope>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }
}

/// Routes requests by category and assembles their output.
#[derive(Clone, Debug)]
pub struct GenerationDispatcher {
    catalog: Arc<DistributionCatalog>,
    resolver: AttributeValueResolver,
    generator: ShapeFieldGenerator,
}

impl Default for GenerationDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(DistributionCatalog::new()))
    }
}

impl GenerationDispatcher {
    pub fn new(catalog: Arc<DistributionCatalog>) -> Self {
        Self {
            resolver: AttributeValueResolver::new(Arc::clone(&catalog)),
            catalog,
            generator: ShapeFieldGenerator::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<DistributionCatalog> {
        &self.catalog
    }

    /// Parse `urn` and dispatch it; a malformed identifier becomes an error notification.
    pub fn dispatch_urn<R: RngCore + ?Sized>(
        &self,
        urn: &str,
        context: &GenerationContext,
        rng: &mut R,
    ) -> GenerationOutput {
        match Urn::parse(urn) {
            Ok(urn) => self.dispatch(&GenerationRequest::from(urn), context, rng),
            Err(err) => {
                GenerationOutput::default().notify(Notification::error(urn, err.to_string()))
            }
        }
    }

    pub fn dispatch<R: RngCore + ?Sized>(
        &self,
        request: &GenerationRequest,
        context: &GenerationContext,
        rng: &mut R,
    ) -> GenerationOutput {
        info!(
            category = %request.category,
            sub_kind = %request.sub_kind,
            parameters = request.parameters.len(),
            "dispatching generation request"
        );
        let output = GenerationOutput::default();
        let label = request.to_string();

        match request.category() {
            Ok(Category::Data) => self.generate_data(request, output, &label),
            Ok(Category::Objects) => {
                self.generate_objects(request, context, output, &label, rng)
            }
            Ok(Category::Events) => output.notify(Notification::error(
                label,
                "unsupported category 'events': event generation is not available",
            )),
            Err(err) => output.notify(Notification::error(label, err.to_string())),
        }
    }

    fn generate_data(
        &self,
        request: &GenerationRequest,
        mut output: GenerationOutput,
        label: &str,
    ) -> GenerationOutput {
        match self.catalog.sample(&request.distribution_tokens()) {
            Ok(value) => output.data = OutputData::Scalar(value),
            Err(err) => output
                .notifications
                .push(Notification::error(label, err.to_string())),
        }
        output
    }

    fn generate_objects<R: RngCore + ?Sized>(
        &self,
        request: &GenerationRequest,
        context: &GenerationContext,
        mut output: GenerationOutput,
        label: &str,
        rng: &mut R,
    ) -> GenerationOutput {
        let Some(envelope) = &context.envelope else {
            return output.notify(Notification::warning(
                label,
                "non-spatial objects are not supported",
            ));
        };
        let config = match ShapeKind::from_name(&request.sub_kind)
            .and_then(|kind| ShapeFieldConfig::from_parameters(kind, &request.parameters))
        {
            Ok(config) => config,
            Err(err) => return output.notify(Notification::error(label, err.to_string())),
        };
        let field = match self.generator.generate(envelope, &config, rng) {
            Ok(field) => field,
            Err(err) => return output.notify(Notification::error(label, err.to_string())),
        };

        output.notifications.extend(field.notifications);
        let mut shapes = field.shapes;
        self.resolve_attributes(request, &mut shapes, &mut output.notifications);
        output.data = OutputData::Shapes(shapes);
        output
    }

    /// Resolve every attribute parameter once per shape. A key whose expression fails is
    /// reported once and skipped for the remaining shapes.
    fn resolve_attributes(
        &self,
        request: &GenerationRequest,
        shapes: &mut [GeneratedShape],
        notifications: &mut Vec<Notification>,
    ) {
        let mut failed: BTreeSet<&str> = BTreeSet::new();
        for shape in shapes.iter_mut() {
            for (key, raw) in request.attributes() {
                if failed.contains(key) {
                    continue;
                }
                match self.resolver.resolve(raw) {
                    Ok(Some(value)) => {
                        shape.attributes.insert(key.to_owned(), value);
                    }
                    Ok(None) => debug!(key, value = raw, "attribute is not numeric; skipped"),
                    Err(err) => {
                        warn!(key, error = %err, "failed to resolve attribute");
                        notifications.push(Notification::warning(
                            format!("attribute '{key}'"),
                            err.to_string(),
                        ));
                        failed.insert(key);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::{Geometry, Projection};
    use crate::notification::Level;

    fn dispatcher() -> GenerationDispatcher {
        GenerationDispatcher::new(Arc::new(DistributionCatalog::with_seed(5)))
    }

    fn spatial() -> GenerationContext {
        GenerationContext::new().with_envelope(
            Envelope::new(0.0, 10.0, 0.0, 10.0, Projection::default()).unwrap(),
        )
    }

    #[test]
    fn data_requests_produce_one_draw() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(1);
        let out = d.dispatch_urn("random:data:uniform#p0=2&p1=3", &spatial(), &mut rng);
        let v = out.scalar().expect("scalar output");
        assert!((2.0..3.0).contains(&v));
        assert!(out.notifications.is_empty());
        assert!(d.catalog().contains(&["uniform", "2", "3"]));
    }

    #[test]
    fn data_request_errors_become_notifications() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(1);
        let out = d.dispatch_urn("random:data:zipf#p0=2", &GenerationContext::new(), &mut rng);
        assert_eq!(out.data, OutputData::None);
        assert!(out.has_errors());
        assert!(out.notifications[0].message.contains("zipf"));
    }

    #[test]
    fn polygons_get_names_and_attributes() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(2);
        let out = d.dispatch_urn(
            "klab:random:objects:polygons#xdivs=4&ydivs=4&fraction=1&height=gaussian(10,2)&kind=forest&weight=3",
            &spatial(),
            &mut rng,
        );
        let shapes = out.shapes();
        assert!(!shapes.is_empty());
        assert_eq!(shapes[0].name, "polygon_1");
        for shape in shapes {
            assert!(matches!(shape.shape.geometry, Geometry::Polygon(_)));
            assert!(shape.attributes["height"].is_finite());
            assert_eq!(shape.attributes["weight"], 3.0);
            assert!(!shape.attributes.contains_key("kind"));
            assert!(!shape.attributes.contains_key("xdivs"));
        }
        assert!(!out.has_errors());
    }

    #[test]
    fn points_and_lines_force_vertex_counts() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(3);
        let points = d.dispatch_urn(
            "random:objects:points#vertices=9&fraction=1",
            &spatial(),
            &mut rng,
        );
        assert!(points.shapes().iter().all(|s| {
            matches!(s.shape.geometry, Geometry::Point(_)) && s.name.starts_with("point_")
        }));
        let lines = d.dispatch_urn("random:objects:lines#fraction=1", &spatial(), &mut rng);
        assert!(lines
            .shapes()
            .iter()
            .all(|s| matches!(s.shape.geometry, Geometry::Line(..))));
    }

    #[test]
    fn objects_without_envelope_warn_and_produce_nothing() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(4);
        let out = d.dispatch(
            &GenerationRequest::new("objects", "polygons"),
            &GenerationContext::new(),
            &mut rng,
        );
        assert_eq!(out.data, OutputData::None);
        assert_eq!(out.notifications.len(), 1);
        assert_eq!(out.notifications[0].level, Level::Warning);
        assert!(out.notifications[0].message.contains("non-spatial"));
    }

    #[test]
    fn unknown_shape_kind_is_reported() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(4);
        let out = d.dispatch_urn("random:objects:circles", &spatial(), &mut rng);
        assert!(out.has_errors());
        assert!(out.notifications[0].message.contains("circles"));
    }

    #[test]
    fn events_and_unknown_categories_are_unsupported() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(6);
        for urn in ["random:events:arrivals", "random:rasters:noise"] {
            let out = d.dispatch_urn(urn, &spatial(), &mut rng);
            assert_eq!(out.data, OutputData::None);
            assert!(out.has_errors(), "{urn}");
        }
    }

    #[test]
    fn failing_attribute_is_reported_once() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(7);
        let out = d.dispatch_urn(
            "random:objects:points#fraction=1&xdivs=3&ydivs=3&bad=beta(1)",
            &spatial(),
            &mut rng,
        );
        assert!(!out.shapes().is_empty());
        assert!(out.shapes().iter().all(|s| s.attributes.is_empty()));
        let warnings: Vec<_> = out
            .notifications
            .iter()
            .filter(|n| n.context == "attribute 'bad'")
            .collect();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn malformed_urn_is_an_error_notification() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(8);
        let out = d.dispatch_urn("nonsense", &spatial(), &mut rng);
        assert!(out.has_errors());
    }

    #[test]
    fn oversized_counts_are_reported_not_panicked_on() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(10);
        for urn in [
            "random:objects:polygons#xdivs=1&ydivs=1&fraction=1&vertices=1000000000000000000",
            "random:objects:points#xdivs=1000000000000000000&ydivs=2&fraction=1",
            "random:objects:lines#xdivs=3&ydivs=99999999999&fraction=1",
        ] {
            let out = d.dispatch_urn(urn, &spatial(), &mut rng);
            assert_eq!(out.data, OutputData::None, "{urn}");
            assert!(out.has_errors(), "{urn}");
            assert!(out.notifications[0].message.contains("must be in"), "{urn}");
        }
    }

    #[test]
    fn frequency_zero_yields_empty_shapes() {
        let d = dispatcher();
        let mut rng = StdRng::seed_from_u64(9);
        let out = d.dispatch_urn("random:objects:polygons#fraction=0", &spatial(), &mut rng);
        assert_eq!(out.data, OutputData::Shapes(Vec::new()));
        assert!(out.notifications.is_empty());
    }
}

use refract_prism::{
    refract::{
        nalgebra::{SVector, Unit, Vector2},
        *,
    },
    *,
};
use std::error::Error;

use arrayvec::ArrayVec;
use core::ops::Deref;

pub use serde_json;

/// This is essentially `try_into` then `try_map` but the latter is nightly-only
pub fn json_array_to_float_array<const D: usize>(
    json_array: &[serde_json::Value],
) -> Option<[Float; D]> {
    let array: &[serde_json::Value; D] = json_array.try_into().ok()?;

    let mut coords = [0.; D];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value.as_f64()? as Float;
    }
    Some(coords)
}

pub fn json_array_to_vector<const D: usize>(
    json_array: &[serde_json::Value],
) -> Option<SVector<Float, D>> {
    json_array_to_float_array(json_array).map(SVector::from)
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    map: impl FnMut(&serde_json::Value) -> Result<T, Box<dyn Error>>,
) -> Result<C, Box<dyn Error>> {
    json.as_array()
        .ok_or("json value must be an array")?
        .iter()
        .map(map)
        .collect()
}

fn get_float(json: &serde_json::Value, field: &str) -> Result<Float, Box<dyn Error>> {
    json.get(field)
        .ok_or_else(|| format!("missing field {field}"))?
        .as_f64()
        .map(|v| v as Float)
        .ok_or_else(|| format!("{field} must be a number").into())
}

fn get_vector<const D: usize>(
    json: &serde_json::Value,
    field: &str,
) -> Result<SVector<Float, D>, Box<dyn Error>> {
    let array = json
        .get(field)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| format!("missing field {field}"))?;

    json_array_to_vector(array)
        .ok_or_else(|| format!("{field} must be an array of {D} numbers").into())
}

fn get_unit<const D: usize>(
    json: &serde_json::Value,
    field: &str,
) -> Result<Unit<SVector<Float, D>>, Box<dyn Error>> {
    Unit::try_new(get_vector(json, field)?, Float::EPSILON)
        .ok_or_else(|| format!("unable to normalize {field}").into())
}

fn vector_to_json(v: &Vector2<Float>) -> serde_json::Value {
    serde_json::json!(v.as_slice())
}

pub trait JsonSer {
    /// Serialize `self` into a JSON object.
    fn to_json(&self) -> serde_json::Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<const CAP: usize, T: JsonSer> JsonSer for ArrayVec<T, CAP> {
    fn to_json(&self) -> serde_json::Value {
        self.deref().to_json()
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON object.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;
}

impl<const CAP: usize, T: JsonDes + Clone> JsonDes for ArrayVec<T, CAP> {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let items: Vec<T> = map_json_array(json, T::from_json)?;
        ArrayVec::try_from(items.as_slice())
            .map_err(|_| format!("expected at most {CAP} elements, got {}", items.len()).into())
    }
}

impl<const D: usize> JsonSer for Ray<D> {
    /// Serialize a ray into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin.as_slice(),
            "direction": self.direction.as_ref().as_slice(),
        })
    }
}

impl<const D: usize> JsonDes for Ray<D> {
    /// Deserialize a new ray from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "origin": [9., 8., 7., ...], // (an array of D floats)
    ///     "direction": [9., 8., 7., ...], // (an array of D floats, must have at least one non-zero value)
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(
            get_vector::<D>(json, "origin")?,
            get_unit(json, "direction")?,
        ))
    }
}

impl JsonSer for PrismParams {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields()
                .into_iter()
                .map(|(name, value, _)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl JsonDes for PrismParams {
    /// Deserialize and validate a parameter set from a JSON object.
    ///
    /// ```json
    /// {
    ///     "n1": 1.0,
    ///     "n2": 1.5,
    ///     "n3": 1.33,
    ///     "l": 0.1,
    ///     "theta1": 45.0
    /// }
    /// ```
    ///
    /// Missing fields take their default value.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        if !json.is_object() {
            return Err("parameters must be a json object".into());
        }

        let defaults = Self::default();
        let field = |name: &str, default: Float| match json.get(name) {
            None => Ok(default),
            Some(_) => get_float(json, name),
        };

        let params = Self {
            n1: field("n1", defaults.n1)?,
            n2: field("n2", defaults.n2)?,
            n3: field("n3", defaults.n3)?,
            l: field("l", defaults.l)?,
            theta1: field("theta1", defaults.theta1)?,
        };

        params.validate()?;
        Ok(params)
    }
}

impl JsonSer for Segment {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": vector_to_json(&self.origin),
            "direction": vector_to_json(&self.direction),
            "length": self.length,
            "end": vector_to_json(&self.end()),
        })
    }
}

impl JsonDes for Segment {
    /// `"end"` is redundant, and ignored if present.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let length = get_float(json, "length")?;
        if length < 0.0 {
            return Err("segment length must be non-negative".into());
        }

        Ok(Self {
            origin: get_vector(json, "origin")?,
            direction: get_unit(json, "direction")?,
            length,
        })
    }
}

impl JsonSer for Crossing {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "distance": self.distance,
            "point": vector_to_json(&self.point),
            "incidence": self.incidence,
            "refraction": self.refraction,
            "direction": vector_to_json(&self.direction),
        })
    }
}

impl JsonDes for Crossing {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            distance: get_float(json, "distance")?,
            point: get_vector(json, "point")?,
            incidence: get_float(json, "incidence")?,
            refraction: get_float(json, "refraction")?,
            direction: get_unit(json, "direction")?,
        })
    }
}

impl JsonSer for Termination {
    fn to_json(&self) -> serde_json::Value {
        match *self {
            Self::Exited => serde_json::json!({ "kind": "exited" }),
            Self::TotalInternalReflection { interface } => serde_json::json!({
                "kind": "total_internal_reflection",
                "interface": interface,
            }),
            Self::MissedInterface { interface } => serde_json::json!({
                "kind": "missed_interface",
                "interface": interface,
            }),
        }
    }
}

impl JsonDes for Termination {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let kind = json
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .ok_or("termination kind must be a string")?;

        let interface = || -> Result<usize, Box<dyn Error>> {
            let i = json
                .get("interface")
                .and_then(serde_json::Value::as_u64)
                .ok_or("interface index must be a non-negative integer")?;
            if i >= 4 {
                return Err(format!("interface index must be less than 4, got {i}").into());
            }
            Ok(i as usize)
        };

        match kind {
            "exited" => Ok(Self::Exited),
            "total_internal_reflection" => Ok(Self::TotalInternalReflection {
                interface: interface()?,
            }),
            "missed_interface" => Ok(Self::MissedInterface {
                interface: interface()?,
            }),
            other => Err(format!("unknown termination kind: {other}").into()),
        }
    }
}

impl JsonSer for HollowPrism {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "thickness": self.thickness(),
            "outer": Vec::from_iter(self.outer_vertices().iter().map(vector_to_json)),
            "inner": Vec::from_iter(self.inner_vertices().iter().map(vector_to_json)),
        })
    }
}

impl JsonDes for HollowPrism {
    /// Only `"thickness"` is read, the vertices are recomputed from it.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(get_float(json, "thickness")?)?)
    }
}

impl JsonSer for PrismTrace {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "params": self.params.to_json(),
            "segments": self.segments.to_json(),
            "crossings": self.crossings.to_json(),
            "refraction_angles": Vec::from_iter(self.refraction_angles()),
            "termination": self.termination.to_json(),
            "exit_angle": self.exit_angle(),
            "deviation": self.deviation(),
        })
    }
}

impl JsonDes for PrismTrace {
    /// `"refraction_angles"`, `"exit_angle"` and `"deviation"` are derived, and ignored if present.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let field = |name: &str| json.get(name).ok_or_else(|| format!("missing field {name}"));

        let trace = Self {
            params: PrismParams::from_json(field("params")?)?,
            segments: JsonDes::from_json(field("segments")?)?,
            crossings: JsonDes::from_json(field("crossings")?)?,
            termination: Termination::from_json(field("termination")?)?,
        };

        if trace.exited() && trace.crossings.len() != 4 {
            return Err("a ray that exited must cross all four walls".into());
        }

        Ok(trace)
    }
}

/// The full document describing a trace: the prism it went through, and the path itself.
pub fn serialize_trace(prism: &HollowPrism, trace: &PrismTrace) -> serde_json::Value {
    serde_json::json!({
        "prism": prism.to_json(),
        "trace": trace.to_json(),
    })
}

pub fn deserialize_trace(
    json: &serde_json::Value,
) -> Result<(HollowPrism, PrismTrace), Box<dyn Error>> {
    let prism = HollowPrism::from_json(json.get("prism").ok_or("prism field expected")?)?;
    let trace = PrismTrace::from_json(json.get("trace").ok_or("trace field expected")?)?;

    if (prism.thickness() - trace.params.l).abs() > EPSILON {
        return Err("prism thickness doesn't match the trace's parameters".into());
    }

    Ok((prism, trace))
}

/// Read parameters from either a bare parameter object, or a document
/// produced by [`serialize_trace`].
pub fn params_from_document(json: &serde_json::Value) -> Result<PrismParams, Box<dyn Error>> {
    match json.get("trace").and_then(|trace| trace.get("params")) {
        Some(params) => PrismParams::from_json(params),
        None => PrismParams::from_json(json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_take_default_values() {
        let params = PrismParams::from_json(&serde_json::json!({ "n2": 2.0 })).unwrap();
        assert_eq!(
            params,
            PrismParams {
                n2: 2.0,
                ..Default::default()
            }
        );

        let params = PrismParams::from_json(&serde_json::json!({})).unwrap();
        assert_eq!(params, PrismParams::default());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = PrismParams::from_json(&serde_json::json!({ "theta1": 95.0 })).unwrap_err();
        assert!(err.to_string().contains("theta1"), "{err}");

        let err = PrismParams::from_json(&serde_json::json!({ "l": "thick" })).unwrap_err();
        assert_eq!(err.to_string(), "l must be a number");

        assert!(PrismParams::from_json(&serde_json::json!([1.0, 1.5])).is_err());
    }

    #[test]
    fn params_round_trip() {
        let params = PrismParams {
            n1: 1.25,
            n2: 2.5,
            n3: 0.75,
            l: 0.125,
            theta1: 33.0,
        };
        assert_eq!(PrismParams::from_json(&params.to_json()).unwrap(), params);
    }

    #[test]
    fn trace_document_round_trips() {
        let params = PrismParams::default();
        let prism = HollowPrism::new(params.l).unwrap();
        let path = trace(&params).unwrap();

        let json = serialize_trace(&prism, &path);
        // go through text, like a file would
        let json: serde_json::Value = serde_json::from_str(&json.to_string()).unwrap();

        let (prism2, path2) = deserialize_trace(&json).unwrap();
        assert_eq!(prism2, prism);
        assert_eq!(path2.params, path.params);
        assert_eq!(path2.termination, path.termination);
        assert_eq!(path2.segments.len(), path.segments.len());
        assert_eq!(params_from_document(&json).unwrap(), params);
    }

    #[test]
    fn trace_document_layout() {
        let params = PrismParams {
            n1: 3.0,
            n2: 3.0,
            n3: 0.5,
            l: 0.01,
            theta1: 30.0,
        };
        let path = trace(&params).unwrap();
        let json = path.to_json();

        assert_eq!(
            json["termination"],
            serde_json::json!({ "kind": "total_internal_reflection", "interface": 1 })
        );
        assert_eq!(json["exit_angle"], serde_json::Value::Null);
        assert_eq!(json["segments"].as_array().unwrap().len(), 2);
        assert_eq!(json["refraction_angles"].as_array().unwrap().len(), 1);
        assert_eq!(json["params"]["l"], serde_json::json!(0.01));
    }

    #[test]
    fn unknown_terminations_are_rejected() {
        assert!(Termination::from_json(&serde_json::json!({ "kind": "absorbed" })).is_err());
        assert!(Termination::from_json(&serde_json::json!({
            "kind": "missed_interface",
            "interface": 7,
        }))
        .is_err());
        assert_eq!(
            Termination::from_json(&serde_json::json!({ "kind": "exited" })).unwrap(),
            Termination::Exited
        );
    }

    #[test]
    fn rays_need_a_direction() {
        let ray = Ray::<2>::from_json(&serde_json::json!({
            "origin": [1.0, 2.0],
            "direction": [0.0, 3.0],
        }))
        .unwrap();
        assert_eq!(ray.direction.into_inner(), Vector2::new(0.0, 1.0));

        assert!(Ray::<2>::from_json(&serde_json::json!({
            "origin": [1.0, 2.0],
            "direction": [0.0, 0.0],
        }))
        .is_err());

        assert!(Ray::<3>::from_json(&serde_json::json!({
            "origin": [1.0, 2.0],
            "direction": [0.0, 1.0],
        }))
        .is_err());
    }

    #[test]
    fn too_many_segments_are_rejected() {
        let segment = serde_json::json!({
            "origin": [0.0, 0.0],
            "direction": [1.0, 0.0],
            "length": 1.0,
        });
        let json = serde_json::Value::Array(vec![segment; 6]);
        assert!(ArrayVec::<Segment, 5>::from_json(&json).is_err());
    }
}

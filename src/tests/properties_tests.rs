use crate::{
    bp::{BPProperties, UpdateType},
    core::{ErrorKind, PropertySet},
};

#[test]
fn property_set_parsing() {
    let props: PropertySet = " [ tol = 1e-9 , maxiter=10,updates=PARALL ] ".parse().unwrap();
    assert_eq!(props.len(), 3);
    assert_eq!(props.get("tol"), Some("1e-9"));
    assert_eq!(props.get_as::<f64>("tol").unwrap(), Some(1e-9));
    assert_eq!(props.require::<usize>("maxiter").unwrap(), 10);
    assert_eq!(props.to_string(), "[maxiter=10,tol=1e-9,updates=PARALL]");
    assert_eq!(props.to_string().parse::<PropertySet>().unwrap(), props);
    assert!("[]".parse::<PropertySet>().unwrap().is_empty());
    for malformed in ["maxiter=10", "[maxiter]", "[=10]", "[maxiter=10"] {
        let err = malformed.parse::<PropertySet>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedProperty, "{}", malformed);
    }
    let err = props.get_as::<usize>("updates").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedProperty);
    let err = props.require::<f64>("damping").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PropertyNotSpecified);
}

fn complete() -> PropertySet {
    PropertySet::new()
        .with("maxiter", 100)
        .with("tol", 1e-9)
        .with("logdomain", "true")
        .with("updates", "SEQRND")
}

#[test]
fn bp_properties_parsing() {
    let props = BPProperties::from_property_set(&complete()).unwrap();
    assert_eq!(
        props,
        BPProperties {
            verbose: 0,
            maxiter: 100,
            tol: 1e-9,
            logdomain: true,
            damping: 0.,
            updates: UpdateType::SeqRnd,
        }
    );
    assert_eq!(
        BPProperties::from_property_set(&props.to_property_set()).unwrap(),
        props
    );
    for name in UpdateType::NAMES {
        let updates: UpdateType = name.parse().unwrap();
        assert_eq!(updates.name(), name);
    }
}

#[test]
fn bp_properties_errors() {
    for key in ["maxiter", "tol", "logdomain", "updates"] {
        let mut props = PropertySet::new();
        for other in ["maxiter", "tol", "logdomain", "updates"] {
            if other != key {
                props.set(other, complete().get(other).unwrap());
            }
        }
        let err = BPProperties::from_property_set(&props).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PropertyNotSpecified, "{}", key);
    }
    let cases = [
        ("updates", "SEQ", ErrorKind::UnknownEnumValue),
        ("maxiter", "-1", ErrorKind::MalformedProperty),
        ("tol", "-1e-3", ErrorKind::MalformedProperty),
        ("tol", "inf", ErrorKind::MalformedProperty),
        ("logdomain", "yes", ErrorKind::MalformedProperty),
        ("damping", "1", ErrorKind::MalformedProperty),
        ("damping", "-0.1", ErrorKind::MalformedProperty),
        ("inference", "fast", ErrorKind::UnknownPropertyType),
    ];
    for (key, value, kind) in cases {
        let err = BPProperties::from_property_set(&complete().with(key, value)).unwrap_err();
        assert_eq!(err.kind(), kind, "{}={}", key, value);
    }
}

#[test]
fn property_set_from_yaml() {
    let yaml = "maxiter: \"50\"\ndamping: \"0.2\"\nupdates: SEQMAX\n";
    let overrides: PropertySet = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(overrides.len(), 3);
    let mut opts = complete();
    opts.merge(overrides);
    let props = BPProperties::from_property_set(&opts).unwrap();
    assert_eq!(props.maxiter, 50);
    assert_eq!(props.damping, 0.2);
    assert_eq!(props.updates, UpdateType::SeqMax);
    assert!(props.logdomain);
    let back: PropertySet = serde_yaml::from_str(&serde_yaml::to_string(&opts).unwrap()).unwrap();
    assert_eq!(back, opts);
}

use reactive_slice::{
    combine_slices,
    configure_store,
    create_slice,
    middleware::thunk::{thunk, ThunkMiddleware},
    Callback, Slice, SliceError, StateEvent, StateTree, StoreConfig,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{cell::RefCell, rc::Rc};

const HOME: &str = "/";
const PROFILE: &str = "/profile";
const NAME: &str = "@dkh-dev/reduxify";

fn router() -> Slice {
    create_slice("router", vec![("route", HOME)]).unwrap()
}

fn profile() -> Slice {
    create_slice("profile", vec![("name", Value::Null), ("visits", json!(0))]).unwrap()
}

#[test]
fn store_without_middlewares() {
    let router = router();
    let profile = profile();
    let get_route = router.selector("getRoute").unwrap();
    let get_name = profile.selector("getName").unwrap();

    let store = configure_store(StoreConfig::new().slices(vec![router.slice(), profile.slice()]));

    assert_eq!(get_route.select(&store.state()), Some(&json!(HOME)));
    assert_eq!(get_name.select(&store.state()), Some(&Value::Null));

    store.dispatch(router.action("setRoute").unwrap().create(PROFILE));
    store.dispatch(profile.action("setName").unwrap().create(NAME));

    assert_eq!(get_route.select(&store.state()), Some(&json!(PROFILE)));
    assert_eq!(get_name.select(&store.state()), Some(&json!(NAME)));
}

#[test]
fn store_with_thunk_middleware() {
    let router = router();
    let get_route = router.selector("getRoute").unwrap();
    let set_route = router.action("setRoute").unwrap().clone();

    let store = configure_store(
        StoreConfig::new()
            .slice(router.slice())
            .middleware(ThunkMiddleware::new()),
    );

    let credentials = Rc::new(RefCell::new(None));
    let credentials_seen = credentials.clone();
    let do_login = move |user: &'static str| {
        let set_route = set_route.clone();
        let credentials_seen = credentials_seen.clone();
        thunk(move |store| {
            *credentials_seen.borrow_mut() = Some(user);
            store.dispatch(set_route.create(PROFILE));
        })
    };

    assert_eq!(get_route.select(&store.state()), Some(&json!(HOME)));

    store.dispatch(do_login("username:password"));

    assert_eq!(*credentials.borrow(), Some("username:password"));
    assert_eq!(get_route.select(&store.state()), Some(&json!(PROFILE)));
}

#[test]
fn setter_updates_only_its_key() {
    let router = router();
    let profile = profile();
    let store = configure_store(StoreConfig::new().slices(vec![router.slice(), profile.slice()]));
    let before = store.state();

    store.dispatch(profile.setter("visits").unwrap().create(3));

    let after = store.state();
    assert_eq!(after.value("profile", "visits"), Some(&json!(3)));
    assert_eq!(after.value("profile", "name"), Some(&Value::Null));
    assert_eq!(after.value("router", "route"), Some(&json!(HOME)));
    assert!(Rc::ptr_eq(
        before.get_rc("router").unwrap(),
        after.get_rc("router").unwrap()
    ));
    assert!(Rc::ptr_eq(
        before.get("profile").unwrap().get_rc("name").unwrap(),
        after.get("profile").unwrap().get_rc("name").unwrap()
    ));
}

#[test]
fn unknown_action_leaves_state_unchanged() {
    let router = router();
    let stranger = create_slice("stranger", vec![("route", HOME)]).unwrap();
    let store = configure_store(StoreConfig::new().slice(router.slice()));
    let before = store.state();

    store.dispatch(stranger.action("setRoute").unwrap().create(PROFILE));

    assert_eq!(*before, *store.state());
    assert!(Rc::ptr_eq(&before, &store.state()));
}

#[test]
fn combined_slices_update_independently() {
    let router = router();
    let profile = profile();
    let root = combine_slices(vec![router.slice(), profile.slice()]);
    let store = reactive_slice::StoreRef::new(root, StateTree::default());

    // The first action fills in every slice's initial state.
    store.dispatch(router.action("setRoute").unwrap().create(PROFILE));
    assert_eq!(store.state().value("router", "route"), Some(&json!(PROFILE)));
    assert_eq!(store.state().value("profile", "visits"), Some(&json!(0)));

    store.dispatch(profile.action("setVisits").unwrap().create(7));
    assert_eq!(store.state().value("router", "route"), Some(&json!(PROFILE)));
    assert_eq!(store.state().value("profile", "visits"), Some(&json!(7)));
}

#[test]
fn replace_reducer_adds_new_slice() {
    let router = router();
    let profile = profile();
    let get_name = profile.selector("getName").unwrap();

    let store = configure_store(StoreConfig::new().slice(router.slice()));
    store.dispatch(router.action("setRoute").unwrap().create(PROFILE));

    assert_eq!(get_name.select(&store.state()), None);

    store.replace_reducer(combine_slices(vec![router.slice(), profile.slice()]));

    assert_eq!(get_name.select(&store.state()), Some(&Value::Null));
    assert_eq!(store.state().value("router", "route"), Some(&json!(PROFILE)));

    store.dispatch(profile.action("setName").unwrap().create(NAME));
    assert_eq!(get_name.select(&store.state()), Some(&json!(NAME)));
}

#[test]
fn replace_reducer_from_thunk_applies_immediately() {
    let router = router();
    let profile = profile();
    let set_name = profile.action("setName").unwrap().clone();
    let get_name = profile.selector("getName").unwrap().clone();
    let replacement = vec![router.slice(), profile.slice()];

    let store = configure_store(
        StoreConfig::new()
            .slice(router.slice())
            .middleware(ThunkMiddleware::new()),
    );

    let seen = Rc::new(RefCell::new(None));
    let seen_copy = seen.clone();
    let replacement = RefCell::new(Some(replacement));
    store.dispatch(thunk(move |store| {
        if let Some(slices) = replacement.borrow_mut().take() {
            store.replace_reducer(combine_slices(slices));
        }
        *seen_copy.borrow_mut() = get_name.select(&store.state()).cloned();
        store.dispatch(set_name.create(NAME));
    }));

    assert_eq!(*seen.borrow(), Some(Value::Null));
    assert_eq!(store.state().value("profile", "name"), Some(&json!(NAME)));
    assert_eq!(store.state().value("router", "route"), Some(&json!(HOME)));
}

#[test]
fn thunk_which_only_replaces_reducer() {
    let router = router();
    let profile = profile();
    let replacement = vec![router.slice(), profile.slice()];

    let store = configure_store(
        StoreConfig::new()
            .slice(router.slice())
            .middleware(ThunkMiddleware::new()),
    );

    let replacement = RefCell::new(Some(replacement));
    store.dispatch(thunk(move |store| {
        if let Some(slices) = replacement.borrow_mut().take() {
            store.replace_reducer(combine_slices(slices));
        }
    }));

    assert_eq!(store.state().value("profile", "name"), Some(&Value::Null));
    assert_eq!(store.state().value("router", "route"), Some(&json!(HOME)));
}

#[test]
fn listener_which_replaces_reducer() {
    let router = router();
    let profile = profile();
    let replacement = RefCell::new(Some(vec![router.slice(), profile.slice()]));

    let store = configure_store(StoreConfig::new().slice(router.slice()));
    let store_copy = store.clone();
    let on_change: Callback<StateTree, StateEvent> = Callback::new(move |_, _| {
        if let Some(slices) = replacement.borrow_mut().take() {
            store_copy.replace_reducer(combine_slices(slices));
        }
    });
    store.subscribe(&on_change);

    store.dispatch(router.action("setRoute").unwrap().create(PROFILE));

    assert_eq!(store.state().value("profile", "name"), Some(&Value::Null));
    assert_eq!(store.state().value("router", "route"), Some(&json!(PROFILE)));
}

#[test]
fn thunk_sees_state_after_its_dispatch() {
    let router = router();
    let set_route = router.action("setRoute").unwrap().clone();
    let get_route = router.getter("route").unwrap().clone();

    let store = configure_store(
        StoreConfig::new()
            .slice(router.slice())
            .middleware(ThunkMiddleware::new()),
    );

    let seen = Rc::new(RefCell::new(None));
    let seen_copy = seen.clone();
    store.dispatch(thunk(move |store| {
        store.dispatch(set_route.create(PROFILE));
        *seen_copy.borrow_mut() = get_route.select(&store.state()).cloned();
    }));

    assert_eq!(*seen.borrow(), Some(json!(PROFILE)));
    assert_eq!(store.state().value("router", "route"), Some(&json!(PROFILE)));
}

#[test]
fn listeners_follow_setter_events() {
    let router = router();
    let profile = profile();
    let store = configure_store(StoreConfig::new().slices(vec![router.slice(), profile.slice()]));

    let routes = Rc::new(RefCell::new(Vec::new()));
    let routes_copy = routes.clone();
    let on_route: Callback<StateTree, StateEvent> = Callback::new(move |state: Rc<StateTree>, _| {
        routes_copy
            .borrow_mut()
            .push(state.value("router", "route").cloned());
    });
    store.subscribe_event(
        &on_route,
        StateEvent::Changed(router.types()[0].clone()),
    );

    let any_change = Rc::new(RefCell::new(0));
    let any_change_copy = any_change.clone();
    let on_any: Callback<StateTree, StateEvent> = Callback::new(move |_, event| {
        assert_eq!(event, StateEvent::None);
        *any_change_copy.borrow_mut() += 1;
    });
    store.subscribe(&on_any);

    store.dispatch(profile.action("setName").unwrap().create(NAME));
    store.dispatch(router.action("setRoute").unwrap().create(PROFILE));

    assert_eq!(*routes.borrow(), vec![Some(json!(PROFILE))]);
    assert_eq!(*any_change.borrow(), 2);
}

#[test]
fn typed_state_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
    struct User {
        id: u64,
        name: String,
    }

    #[derive(Serialize)]
    struct Session {
        user: Option<User>,
        token: Option<String>,
    }

    let session = Slice::from_state(
        "session",
        &Session {
            user: None,
            token: None,
        },
    )
    .unwrap();
    let store = configure_store(StoreConfig::new().slice(session.slice()));
    let get_user = session.selector("getUser").unwrap();

    assert_eq!(get_user.select_as::<Option<User>>(&store.state()).unwrap(), Some(None));

    let user = User {
        id: 1,
        name: "dkh".to_string(),
    };
    store.dispatch(session.action("setUser").unwrap().create_from(&user).unwrap());

    assert_eq!(
        get_user.select_as::<User>(&store.state()).unwrap(),
        Some(user)
    );
    assert!(matches!(
        session
            .selector("getToken")
            .unwrap()
            .select_as::<u64>(&store.state()),
        Err(SliceError::Json(_))
    ));
}

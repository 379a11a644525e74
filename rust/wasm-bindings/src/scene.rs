// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene nodes owned by the JavaScript renderer.

use std::rc::Rc;

use nalgebra::Vector3;
use spacefolio_core::SceneNode;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(typescript_custom_section)]
const SCENE_OBJECT_TS: &'static str = r#"
/** Transform group of a loaded scene, usually a thin wrapper over a THREE.Group. */
export interface SceneObject {
    setScale(scale: number): void;
    setPosition(x: number, y: number, z: number): void;
    setRotation(x: number, y: number, z: number): void;
    setOpacity(opacity: number): void;
    clone(): SceneObject;
}
"#;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(typescript_type = "SceneObject")]
    #[derive(Clone)]
    pub type JsSceneObject;

    #[wasm_bindgen(method, js_name = setScale)]
    fn set_scale(this: &JsSceneObject, scale: f64);

    #[wasm_bindgen(method, js_name = setPosition)]
    fn set_position(this: &JsSceneObject, x: f64, y: f64, z: f64);

    #[wasm_bindgen(method, js_name = setRotation)]
    fn set_rotation(this: &JsSceneObject, x: f64, y: f64, z: f64);

    #[wasm_bindgen(method, js_name = setOpacity)]
    fn set_opacity(this: &JsSceneObject, opacity: f64);

    #[wasm_bindgen(method, js_name = clone)]
    fn clone_object(this: &JsSceneObject) -> JsSceneObject;
}

/// [`SceneNode`] over a JS scene object.
pub struct JsSceneNode(JsSceneObject);

impl JsSceneNode {
    pub fn new(object: JsSceneObject) -> Rc<Self> {
        Rc::new(Self(object))
    }
}

impl SceneNode for JsSceneNode {
    fn set_scale(&self, scale: f64) {
        self.0.set_scale(scale);
    }

    fn set_position(&self, position: Vector3<f64>) {
        self.0.set_position(position.x, position.y, position.z);
    }

    fn set_rotation(&self, rotation: Vector3<f64>) {
        self.0.set_rotation(rotation.x, rotation.y, rotation.z);
    }

    fn set_opacity(&self, opacity: f64) {
        self.0.set_opacity(opacity);
    }

    fn clone_node(&self) -> Rc<dyn SceneNode> {
        JsSceneNode::new(self.0.clone_object())
    }
}

/// Read-only view of a bone's world transform.
///
/// The 2x2 linear map `[m00 m01; m10 m11]` carries the rotation, scale and shear accumulated from
/// the skeleton root; `(world_x, world_y)` is the bone origin in world space. How a skeleton arrives
/// at these values is up to the implementor.
pub trait BoneTransform {
    fn world_x(&self) -> f32;
    fn world_y(&self) -> f32;
    fn m00(&self) -> f32;
    fn m01(&self) -> f32;
    fn m10(&self) -> f32;
    fn m11(&self) -> f32;
}

impl<T: BoneTransform + ?Sized> BoneTransform for &T {
    fn world_x(&self) -> f32 {
        (**self).world_x()
    }
    fn world_y(&self) -> f32 {
        (**self).world_y()
    }
    fn m00(&self) -> f32 {
        (**self).m00()
    }
    fn m01(&self) -> f32 {
        (**self).m01()
    }
    fn m10(&self) -> f32 {
        (**self).m10()
    }
    fn m11(&self) -> f32 {
        (**self).m11()
    }
}

/// A bone's world transform as a plain value.
///
/// Field names follow the Spine runtimes: `a`/`b` are the first row of the linear map, `c`/`d` the
/// second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bone {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub world_x: f32,
    pub world_y: f32,
}

impl Default for Bone {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Bone {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        world_x: 0.0,
        world_y: 0.0,
    };

    /// World transform of a root bone with the given local pose.
    pub fn from_local(
        x: f32,
        y: f32,
        rotation: f32,
        scale_x: f32,
        scale_y: f32,
        shear_x: f32,
        shear_y: f32,
    ) -> Self {
        let (a, b, c, d) = local_linear(rotation, scale_x, scale_y, shear_x, shear_y);
        Self {
            a,
            b,
            c,
            d,
            world_x: x,
            world_y: y,
        }
    }

    /// World transform of a bone whose local pose is expressed in `parent`'s space.
    ///
    /// Only full inheritance is modeled here.
    #[allow(clippy::too_many_arguments)]
    pub fn child(
        parent: &impl BoneTransform,
        x: f32,
        y: f32,
        rotation: f32,
        scale_x: f32,
        scale_y: f32,
        shear_x: f32,
        shear_y: f32,
    ) -> Self {
        let pa = parent.m00();
        let pb = parent.m01();
        let pc = parent.m10();
        let pd = parent.m11();

        let (la, lb, lc, ld) = local_linear(rotation, scale_x, scale_y, shear_x, shear_y);
        Self {
            a: pa * la + pb * lc,
            b: pa * lb + pb * ld,
            c: pc * la + pd * lc,
            d: pc * lb + pd * ld,
            world_x: pa * x + pb * y + parent.world_x(),
            world_y: pc * x + pd * y + parent.world_y(),
        }
    }

    pub fn local_to_world(&self, local_x: f32, local_y: f32) -> (f32, f32) {
        (
            local_x * self.a + local_y * self.b + self.world_x,
            local_x * self.c + local_y * self.d + self.world_y,
        )
    }

    /// Rotation of the bone's x axis in world space, in degrees.
    pub fn world_rotation_x(&self) -> f32 {
        self.c.atan2(self.a).to_degrees()
    }
}

fn local_linear(
    rotation: f32,
    scale_x: f32,
    scale_y: f32,
    shear_x: f32,
    shear_y: f32,
) -> (f32, f32, f32, f32) {
    let rotation_x = (rotation + shear_x).to_radians();
    let rotation_y = (rotation + 90.0 + shear_y).to_radians();
    (
        rotation_x.cos() * scale_x,
        rotation_y.cos() * scale_y,
        rotation_x.sin() * scale_x,
        rotation_y.sin() * scale_y,
    )
}

impl BoneTransform for Bone {
    fn world_x(&self) -> f32 {
        self.world_x
    }
    fn world_y(&self) -> f32 {
        self.world_y
    }
    fn m00(&self) -> f32 {
        self.a
    }
    fn m01(&self) -> f32 {
        self.b
    }
    fn m10(&self) -> f32 {
        self.c
    }
    fn m11(&self) -> f32 {
        self.d
    }
}

// glam stores the linear part column-major: `x_axis` is the first column.
#[cfg(feature = "glam")]
impl BoneTransform for glam::Affine2 {
    fn world_x(&self) -> f32 {
        self.translation.x
    }
    fn world_y(&self) -> f32 {
        self.translation.y
    }
    fn m00(&self) -> f32 {
        self.matrix2.x_axis.x
    }
    fn m01(&self) -> f32 {
        self.matrix2.y_axis.x
    }
    fn m10(&self) -> f32 {
        self.matrix2.x_axis.y
    }
    fn m11(&self) -> f32 {
        self.matrix2.y_axis.y
    }
}

#[cfg(feature = "glam")]
impl From<Bone> for glam::Affine2 {
    fn from(bone: Bone) -> Self {
        glam::Affine2::from_mat2_translation(
            glam::Mat2::from_cols(
                glam::Vec2::new(bone.a, bone.c),
                glam::Vec2::new(bone.b, bone.d),
            ),
            glam::Vec2::new(bone.world_x, bone.world_y),
        )
    }
}

#[cfg(feature = "glam")]
impl From<glam::Affine2> for Bone {
    fn from(affine: glam::Affine2) -> Self {
        Self {
            a: affine.m00(),
            b: affine.m01(),
            c: affine.m10(),
            d: affine.m11(),
            world_x: affine.world_x(),
            world_y: affine.world_y(),
        }
    }
}

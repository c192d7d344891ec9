#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    Up,
    Down,
    Left,
    Right,

    Escape,
    Enter,
    Space,
    Tab,
    Backspace,

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
}
